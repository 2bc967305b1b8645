use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::mechanism_hal::{HalError, HalResult, HardwareMap, MotorDirection, MotorHal, ServoHal};

#[derive(Debug, Clone, Serialize)]
pub struct ServoRecord {
    pub position: Option<f64>,
    pub commands: usize,
    #[serde(skip)]
    connected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MotorRecord {
    pub power: f64,
    pub direction: MotorDirection,
    pub commands: usize,
    #[serde(skip)]
    connected: bool,
}

/// Test-side view of a mock servo; shares state with the device handed to the mechanism.
#[derive(Debug, Clone)]
pub struct MockServoHandle(Rc<RefCell<ServoRecord>>);

#[derive(Debug, Clone)]
pub struct MockMotorHandle(Rc<RefCell<MotorRecord>>);

impl MockServoHandle {
    pub fn position(&self) -> Option<f64> {
        self.0.borrow().position
    }

    pub fn commands(&self) -> usize {
        self.0.borrow().commands
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.borrow_mut().connected = connected;
    }
}

impl MockMotorHandle {
    pub fn power(&self) -> f64 {
        self.0.borrow().power
    }

    pub fn direction(&self) -> MotorDirection {
        self.0.borrow().direction
    }

    pub fn commands(&self) -> usize {
        self.0.borrow().commands
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.borrow_mut().connected = connected;
    }
}

struct MockServo {
    name: String,
    record: MockServoHandle,
}

struct MockMotor {
    name: String,
    record: MockMotorHandle,
}

fn disconnected(kind: &str, name: &str) -> HalError {
    HalError::DeviceNotConnected(format!("{kind} {name:?} not connected"))
}

impl ServoHal for MockServo {
    fn set_position(&mut self, position: f64) -> HalResult<()> {
        let mut record = self.record.0.borrow_mut();
        if !record.connected {
            return Err(disconnected("servo", &self.name));
        }
        debug!("{}: set_position {position}", self.name);
        record.position = Some(position);
        record.commands += 1;
        Ok(())
    }

    fn position(&self) -> HalResult<f64> {
        let record = self.record.0.borrow();
        if !record.connected {
            return Err(disconnected("servo", &self.name));
        }
        record.position
            .ok_or_else(|| HalError::InternalError(format!("servo {:?} has no position yet", self.name)))
    }
}

impl MotorHal for MockMotor {
    fn set_power(&mut self, power: f64) -> HalResult<()> {
        let mut record = self.record.0.borrow_mut();
        if !record.connected {
            return Err(disconnected("motor", &self.name));
        }
        if record.power != power {
            debug!("{}: set_power {power}", self.name);
        }
        record.power = power;
        record.commands += 1;
        Ok(())
    }

    fn set_direction(&mut self, direction: MotorDirection) -> HalResult<()> {
        let mut record = self.record.0.borrow_mut();
        if !record.connected {
            return Err(disconnected("motor", &self.name));
        }
        debug!("{}: set_direction {direction:?}", self.name);
        record.direction = direction;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockHardwareMap {
    servos: BTreeMap<String, MockServoHandle>,
    motors: BTreeMap<String, MockMotorHandle>,
}

#[derive(Debug, Serialize)]
pub struct HardwareSnapshot {
    pub servos: BTreeMap<String, ServoRecord>,
    pub motors: BTreeMap<String, MotorRecord>,
}

impl MockHardwareMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_servo(&mut self, name: &str) -> MockServoHandle {
        self.servos
            .entry(name.to_owned())
            .or_insert_with(|| MockServoHandle(Rc::new(RefCell::new(ServoRecord {
                position: None,
                commands: 0,
                connected: true,
            }))))
            .clone()
    }

    pub fn add_motor(&mut self, name: &str) -> MockMotorHandle {
        self.motors
            .entry(name.to_owned())
            .or_insert_with(|| MockMotorHandle(Rc::new(RefCell::new(MotorRecord {
                power: 0.0,
                direction: MotorDirection::Forward,
                commands: 0,
                connected: true,
            }))))
            .clone()
    }

    pub fn snapshot(&self) -> HardwareSnapshot {
        HardwareSnapshot {
            servos: self.servos.iter().map(|(k, v)| (k.clone(), v.0.borrow().clone())).collect(),
            motors: self.motors.iter().map(|(k, v)| (k.clone(), v.0.borrow().clone())).collect(),
        }
    }
}

impl HardwareMap for MockHardwareMap {
    fn servo(&mut self, name: &str) -> HalResult<Box<dyn ServoHal>> {
        let record = self.servos.get(name)
            .ok_or_else(|| HalError::DeviceNotConnected(format!("no servo named {name:?} in hardware map")))?;
        Ok(Box::new(MockServo { name: name.to_owned(), record: record.clone() }))
    }

    fn motor(&mut self, name: &str) -> HalResult<Box<dyn MotorHal>> {
        let record = self.motors.get(name)
            .ok_or_else(|| HalError::DeviceNotConnected(format!("no motor named {name:?} in hardware map")))?;
        Ok(Box::new(MockMotor { name: name.to_owned(), record: record.clone() }))
    }
}
