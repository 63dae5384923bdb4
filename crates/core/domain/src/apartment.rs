//! 公寓与站点配置。
//!
//! 站点在进程启动时构造一次，之后只读；各组件通过 `Arc<SiteConfig>` 共享。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 设备类别（每套公寓每类一台，墙壁开关按房间各一台）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Aqi,
    WallSwitch,
    Socket,
    Curtain,
    PeopleCounter,
    CircuitBreaker,
    WaterMeter,
    GasMeter,
    DoorLock,
    Thermostat,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 10] = [
        DeviceCategory::Aqi,
        DeviceCategory::WallSwitch,
        DeviceCategory::Socket,
        DeviceCategory::Curtain,
        DeviceCategory::PeopleCounter,
        DeviceCategory::CircuitBreaker,
        DeviceCategory::WaterMeter,
        DeviceCategory::GasMeter,
        DeviceCategory::DoorLock,
        DeviceCategory::Thermostat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceCategory::Aqi => "aqi",
            DeviceCategory::WallSwitch => "wall_switch",
            DeviceCategory::Socket => "socket",
            DeviceCategory::Curtain => "curtain",
            DeviceCategory::PeopleCounter => "people_counter",
            DeviceCategory::CircuitBreaker => "circuit_breaker",
            DeviceCategory::WaterMeter => "water_meter",
            DeviceCategory::GasMeter => "gas_meter",
            DeviceCategory::DoorLock => "door_lock",
            DeviceCategory::Thermostat => "thermostat",
        }
    }
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每套公寓的设备标识。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIds {
    pub aqi_device_id: String,
    pub switch_device_id: String,
    pub socket_device_id: String,
    pub curtain_device_id: String,
    pub peoplecounter_device_id: String,
    pub doorlock_device_id: String,
    pub thermostat_device_id: String,
    pub watermeter_device_id: String,
    pub gasmeter_device_id: String,
    pub scb_device_id: String,
}

/// 单套公寓配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentConfig {
    pub id: String,
    pub rooms: Vec<String>,
    #[serde(flatten)]
    pub devices: DeviceIds,
}

impl ApartmentConfig {
    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.iter().any(|item| item == room)
    }

    /// 设备标识；墙壁开关为 `{switch_device_id}_{room}`。
    pub fn device_id(&self, category: DeviceCategory, room: Option<&str>) -> String {
        let devices = &self.devices;
        match category {
            DeviceCategory::Aqi => devices.aqi_device_id.clone(),
            DeviceCategory::WallSwitch => match room {
                Some(room) => format!("{}_{}", devices.switch_device_id, room),
                None => devices.switch_device_id.clone(),
            },
            DeviceCategory::Socket => devices.socket_device_id.clone(),
            DeviceCategory::Curtain => devices.curtain_device_id.clone(),
            DeviceCategory::PeopleCounter => devices.peoplecounter_device_id.clone(),
            DeviceCategory::CircuitBreaker => devices.scb_device_id.clone(),
            DeviceCategory::WaterMeter => devices.watermeter_device_id.clone(),
            DeviceCategory::GasMeter => devices.gasmeter_device_id.clone(),
            DeviceCategory::DoorLock => devices.doorlock_device_id.clone(),
            DeviceCategory::Thermostat => devices.thermostat_device_id.clone(),
        }
    }
}

/// 站点配置错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SiteConfigError {
    #[error("site has no apartments")]
    Empty,
    #[error("duplicate apartment id: {0}")]
    DuplicateApartment(String),
    #[error("apartment {0} has no rooms")]
    NoRooms(String),
    #[error("apartment {0} has duplicate room: {1}")]
    DuplicateRoom(String, String),
}

/// 站点：启动时固定的公寓集合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub apartments: Vec<ApartmentConfig>,
}

impl SiteConfig {
    pub fn apartment(&self, apartment_id: &str) -> Option<&ApartmentConfig> {
        self.apartments.iter().find(|item| item.id == apartment_id)
    }

    pub fn validate(&self) -> Result<(), SiteConfigError> {
        if self.apartments.is_empty() {
            return Err(SiteConfigError::Empty);
        }
        let mut ids = HashSet::new();
        for apartment in &self.apartments {
            if !ids.insert(apartment.id.as_str()) {
                return Err(SiteConfigError::DuplicateApartment(apartment.id.clone()));
            }
            if apartment.rooms.is_empty() {
                return Err(SiteConfigError::NoRooms(apartment.id.clone()));
            }
            let mut rooms = HashSet::new();
            for room in &apartment.rooms {
                if !rooms.insert(room.as_str()) {
                    return Err(SiteConfigError::DuplicateRoom(
                        apartment.id.clone(),
                        room.clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// 内置站点：开间与一居室。
    pub fn builtin() -> Self {
        Self {
            apartments: vec![
                builtin_apartment(
                    "studio_apartment",
                    "studio",
                    &["kitchen", "bathroom", "main"],
                ),
                builtin_apartment(
                    "1_bedroom",
                    "1bed",
                    &["powder_room", "bedroom", "living_room", "dressing_room"],
                ),
            ],
        }
    }
}

fn builtin_apartment(id: &str, tag: &str, rooms: &[&str]) -> ApartmentConfig {
    ApartmentConfig {
        id: id.to_string(),
        rooms: rooms.iter().map(|room| room.to_string()).collect(),
        devices: DeviceIds {
            aqi_device_id: format!("aqi_{tag}_01"),
            switch_device_id: format!("switch_{tag}_01"),
            socket_device_id: format!("socket_{tag}_01"),
            curtain_device_id: format!("curtain_{tag}_01"),
            peoplecounter_device_id: format!("vs350_{tag}_01"),
            doorlock_device_id: format!("doorlock_{tag}_01"),
            thermostat_device_id: format!("thermo_{tag}_01"),
            watermeter_device_id: format!("water_{tag}_01"),
            gasmeter_device_id: format!("gas_{tag}_01"),
            scb_device_id: format!("scb_{tag}_01"),
        },
    }
}
