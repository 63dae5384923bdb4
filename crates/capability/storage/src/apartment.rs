//! 单套公寓的设备记录集合。

use crate::cell::RecordCell;
use crate::error::StorageError;
use domain::{
    AqiState, ApartmentState, CircuitBreakerState, CurtainState, DeviceCategory, DeviceSnapshot,
    DoorLockState, MeterState, PeopleCounterState, SocketState, ThermostatState, WallSwitchState,
};

/// 一套公寓的全部记录：每类设备一把锁，墙壁开关每个房间一把锁。
#[derive(Debug)]
pub struct ApartmentRecords {
    aqi: RecordCell<AqiState>,
    switches: Vec<(String, RecordCell<WallSwitchState>)>,
    socket: RecordCell<SocketState>,
    curtain: RecordCell<CurtainState>,
    people_counter: RecordCell<PeopleCounterState>,
    circuit_breaker: RecordCell<CircuitBreakerState>,
    water_meter: RecordCell<MeterState>,
    gas_meter: RecordCell<MeterState>,
    door_lock: RecordCell<DoorLockState>,
    thermostat: RecordCell<ThermostatState>,
}

impl ApartmentRecords {
    pub fn new(state: ApartmentState) -> Self {
        Self {
            aqi: RecordCell::new(state.aqi),
            switches: state
                .switches
                .into_iter()
                .map(|(room, switch)| (room, RecordCell::new(switch)))
                .collect(),
            socket: RecordCell::new(state.socket),
            curtain: RecordCell::new(state.curtain),
            people_counter: RecordCell::new(state.people_counter),
            circuit_breaker: RecordCell::new(state.circuit_breaker),
            water_meter: RecordCell::new(state.water_meter),
            gas_meter: RecordCell::new(state.gas_meter),
            door_lock: RecordCell::new(state.door_lock),
            thermostat: RecordCell::new(state.thermostat),
        }
    }

    pub fn aqi(&self) -> &RecordCell<AqiState> {
        &self.aqi
    }

    pub fn switch(&self, room: &str) -> Result<&RecordCell<WallSwitchState>, StorageError> {
        self.switches
            .iter()
            .find(|(name, _)| name == room)
            .map(|(_, cell)| cell)
            .ok_or_else(|| StorageError::RoomNotFound(room.to_string()))
    }

    /// 按房间配置顺序遍历墙壁开关。
    pub fn switches(&self) -> impl Iterator<Item = (&str, &RecordCell<WallSwitchState>)> {
        self.switches
            .iter()
            .map(|(room, cell)| (room.as_str(), cell))
    }

    pub fn socket(&self) -> &RecordCell<SocketState> {
        &self.socket
    }

    pub fn curtain(&self) -> &RecordCell<CurtainState> {
        &self.curtain
    }

    pub fn people_counter(&self) -> &RecordCell<PeopleCounterState> {
        &self.people_counter
    }

    pub fn circuit_breaker(&self) -> &RecordCell<CircuitBreakerState> {
        &self.circuit_breaker
    }

    pub fn water_meter(&self) -> &RecordCell<MeterState> {
        &self.water_meter
    }

    pub fn gas_meter(&self) -> &RecordCell<MeterState> {
        &self.gas_meter
    }

    pub fn door_lock(&self) -> &RecordCell<DoorLockState> {
        &self.door_lock
    }

    pub fn thermostat(&self) -> &RecordCell<ThermostatState> {
        &self.thermostat
    }

    /// 读取单台设备快照；墙壁开关需要房间。
    pub fn snapshot(
        &self,
        category: DeviceCategory,
        room: Option<&str>,
    ) -> Result<DeviceSnapshot, StorageError> {
        let snapshot = match category {
            DeviceCategory::Aqi => DeviceSnapshot::Aqi(self.aqi.snapshot()),
            DeviceCategory::WallSwitch => {
                let room = room.ok_or_else(|| StorageError::RoomNotFound(String::new()))?;
                DeviceSnapshot::WallSwitch(self.switch(room)?.snapshot())
            }
            DeviceCategory::Socket => DeviceSnapshot::Socket(self.socket.snapshot()),
            DeviceCategory::Curtain => DeviceSnapshot::Curtain(self.curtain.snapshot()),
            DeviceCategory::PeopleCounter => {
                DeviceSnapshot::PeopleCounter(self.people_counter.snapshot())
            }
            DeviceCategory::CircuitBreaker => {
                DeviceSnapshot::CircuitBreaker(self.circuit_breaker.snapshot())
            }
            DeviceCategory::WaterMeter => DeviceSnapshot::WaterMeter(self.water_meter.snapshot()),
            DeviceCategory::GasMeter => DeviceSnapshot::GasMeter(self.gas_meter.snapshot()),
            DeviceCategory::DoorLock => DeviceSnapshot::DoorLock(self.door_lock.snapshot()),
            DeviceCategory::Thermostat => DeviceSnapshot::Thermostat(self.thermostat.snapshot()),
        };
        Ok(snapshot)
    }
}
