//! 轮询条目名解析。
//!
//! 条目名（如 `Apartment_Thermostat_setpoint_temperature`）映射到设备类别与字段。
//! 先按类别标记（`PeopleCounter`、`CircuitBreaker` 等）匹配，再按后缀匹配公寓级设备；
//! 同一类别内取最长后缀，`_valve_status` 不会被 `_status` 抢先命中。

use crate::apartment::DeviceCategory;

/// 条目解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    Field {
        category: DeviceCategory,
        field: String,
    },
    /// 墙壁开关条目必须带房间段。
    RequiresRoom,
    Unknown,
}

const PEOPLE_COUNTER_FIELDS: &[&str] = &[
    "total_in",
    "total_out",
    "period_in",
    "period_out",
    "battery",
    "temperature",
    "count",
];

const CIRCUIT_BREAKER_FIELDS: &[&str] = &[
    "device_type",
    "breaker_address",
    "breaker_type",
    "switch_state",
    "remote_control_enabled",
    "voltage_A",
    "voltage_B",
    "voltage_C",
    "current_A",
    "current_B",
    "current_C",
    "current_N",
    "power_A",
    "power_B",
    "power_C",
    "power_total",
    "power_factor_A",
    "power_factor_B",
    "power_factor_C",
    "leakage_current",
    "temperature_device",
    "temperature_terminal_A",
    "temperature_terminal_B",
    "temperature_terminal_C",
    "temperature_terminal_N",
    "alarm_short_circuit",
    "alarm_over_current",
    "alarm_over_voltage",
    "alarm_under_voltage",
    "alarm_leakage",
    "alarm_overload",
    "alarm_temperature",
    "alarm_fire",
    "alarm_surge",
    "alarm_phase_loss",
];

const THERMOSTAT_FIELDS: &[&str] = &[
    "setpoint_temperature",
    "temperature",
    "humidity",
    "mode",
    "status",
    "fan_setting",
    "valve_status",
    "fan_status",
    "co2",
    "power",
];

const WATER_METER_FIELDS: &[&str] = &[
    "volume",
    "valve_state",
    "battery",
    "low_power",
    "alarm",
    "communication_error",
];

const GAS_METER_FIELDS: &[&str] = &["volume", "valve_state", "battery", "low_power", "alarm"];

const SOCKET_FIELDS: &[(&str, &str)] = &[
    ("_socket_current", "current"),
    ("_socket_voltage", "voltage"),
    ("_socket_active_power", "active_power"),
    ("_socket_power_consumption", "power_consumption"),
    ("_socket_power_factor", "power_factor"),
    ("_socket_status", "socket_status"),
];

const CURTAIN_FIELDS: &[(&str, &str)] = &[
    ("_curtainstate", "curtainstate"),
    ("_curtain_battery", "battery"),
];

const AQI_FIELDS: &[(&str, &str)] = &[
    ("_temp", "temp"),
    ("_humd", "humd"),
    ("_co2", "co2"),
    ("_battery", "battery"),
];

const WALL_SWITCH_FIELDS: &[&str] = &[
    "current",
    "voltage",
    "active_power",
    "power_consumption",
    "power_factor",
    "switch_1",
    "switch_2",
    "switch_3",
    "switch_4",
];

/// 解析公寓级条目名（不带房间段）。
pub fn resolve_item(item_name: &str) -> ItemLookup {
    let marked: &[(&str, DeviceCategory, &[&str])] = &[
        ("PeopleCounter", DeviceCategory::PeopleCounter, PEOPLE_COUNTER_FIELDS),
        ("CircuitBreaker", DeviceCategory::CircuitBreaker, CIRCUIT_BREAKER_FIELDS),
        ("WaterMeter", DeviceCategory::WaterMeter, WATER_METER_FIELDS),
        ("GasMeter", DeviceCategory::GasMeter, GAS_METER_FIELDS),
    ];
    for (marker, category, fields) in marked {
        if item_name.contains(*marker) {
            return match longest_suffix(item_name, fields) {
                Some(field) => field_lookup(*category, field),
                None => ItemLookup::Unknown,
            };
        }
    }

    if item_name.contains("Thermostat") {
        if item_name.ends_with("_setpoint_timestamp") {
            return field_lookup(DeviceCategory::Thermostat, "last_setpoint_timestamp");
        }
        return match longest_suffix(item_name, THERMOSTAT_FIELDS) {
            Some(field) => field_lookup(DeviceCategory::Thermostat, field),
            None => ItemLookup::Unknown,
        };
    }

    if item_name.contains("DoorLock") && item_name.contains("_door_") {
        let field = item_name
            .split_once("DoorLock_")
            .map(|(_, rest)| rest)
            .unwrap_or(item_name);
        let field = field.strip_prefix("door_").unwrap_or(field);
        return field_lookup(DeviceCategory::DoorLock, field);
    }

    let by_suffix: &[(DeviceCategory, &[(&str, &str)])] = &[
        (DeviceCategory::Curtain, CURTAIN_FIELDS),
        (DeviceCategory::Socket, SOCKET_FIELDS),
        (DeviceCategory::Aqi, AQI_FIELDS),
    ];
    for (category, fields) in by_suffix {
        if let Some((_, field)) = fields.iter().find(|(suffix, _)| item_name.ends_with(*suffix)) {
            return field_lookup(*category, field);
        }
    }

    if item_name.contains("Switch") {
        return ItemLookup::RequiresRoom;
    }
    ItemLookup::Unknown
}

/// 解析墙壁开关条目名（带房间段的接口）。
pub fn resolve_switch_item(item_name: &str) -> ItemLookup {
    match longest_suffix(item_name, WALL_SWITCH_FIELDS) {
        Some(field) => field_lookup(DeviceCategory::WallSwitch, field),
        None => ItemLookup::Unknown,
    }
}

fn field_lookup(category: DeviceCategory, field: &str) -> ItemLookup {
    ItemLookup::Field {
        category,
        field: field.to_string(),
    }
}

fn longest_suffix(item_name: &str, fields: &[&'static str]) -> Option<&'static str> {
    fields
        .iter()
        .copied()
        .filter(|field| {
            item_name
                .strip_suffix(*field)
                .is_some_and(|rest| rest.ends_with('_'))
        })
        .max_by_key(|field| field.len())
}
