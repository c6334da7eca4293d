//! Sensor subsystem: the three light sensors and the aggregating [`SensorHub`].

pub mod light;

use crate::app::ports::Channel;
use crate::error::SensorError;
use crate::pins;
use light::LightSensor;

/// Owns one [`LightSensor`] per channel.
pub struct SensorHub {
    pub obstacle_a: LightSensor,
    pub obstacle_b: LightSensor,
    pub ambient: LightSensor,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers.
    pub fn new(obstacle_a: LightSensor, obstacle_b: LightSensor, ambient: LightSensor) -> Self {
        Self {
            obstacle_a,
            obstacle_b,
            ambient,
        }
    }

    /// Hub wired to the board's ADC assignments in [`pins`].
    pub fn from_pins() -> Self {
        Self::new(
            LightSensor::new(Channel::ObstacleA, pins::OBSTACLE_A_ADC_CH),
            LightSensor::new(Channel::ObstacleB, pins::OBSTACLE_B_ADC_CH),
            LightSensor::new(Channel::Ambient, pins::AMBIENT_ADC_CH),
        )
    }

    /// Read one channel.
    pub fn read(&self, channel: Channel) -> Result<u16, SensorError> {
        match channel {
            Channel::ObstacleA => self.obstacle_a.read(),
            Channel::ObstacleB => self.obstacle_b.read(),
            Channel::Ambient => self.ambient.read(),
        }
    }
}
