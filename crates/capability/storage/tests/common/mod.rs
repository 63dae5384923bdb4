use domain::{
    AqiState, ApartmentState, CircuitBreakerState, CurtainState, DoorLockState, FanSetting,
    MeterState, PeopleCounterState, PowerState, SocketState, ThermostatMode, ThermostatState,
    WallSwitchState,
};

pub fn wall_switch() -> WallSwitchState {
    WallSwitchState {
        current: 250,
        voltage: 240.0,
        active_power: 40,
        power_consumption: 95_000,
        power_factor: 90,
        switch_1: 1,
        switch_2: 0,
        switch_3: 0,
        switch_4: 0,
    }
}

pub fn circuit_breaker() -> CircuitBreakerState {
    let mut breaker = CircuitBreakerState {
        device_type: "SCB-100".to_string(),
        breaker_address: 1,
        breaker_type: "3P4P".to_string(),
        switch_state: 1,
        remote_control_enabled: true,
        voltage_a: 230.0,
        voltage_b: 231.0,
        voltage_c: 229.5,
        current_a: 1.5,
        current_b: 2.0,
        current_c: 0.5,
        current_n: 0.2,
        power_a: 0.0,
        power_b: 0.0,
        power_c: 0.0,
        power_total: 0.0,
        power_factor_a: 0.9,
        power_factor_b: 0.95,
        power_factor_c: 0.85,
        leakage_current: 0,
        temperature_device: 30,
        temperature_terminal_a: 30,
        temperature_terminal_b: 31,
        temperature_terminal_c: 29,
        temperature_terminal_n: 28,
        alarm_short_circuit: false,
        alarm_over_current: false,
        alarm_over_voltage: false,
        alarm_under_voltage: false,
        alarm_leakage: false,
        alarm_overload: false,
        alarm_temperature: false,
        alarm_fire: false,
        alarm_surge: false,
        alarm_phase_loss: false,
    };
    breaker.recompute_power();
    breaker
}

pub fn apartment_state(apartment_id: &str, rooms: &[&str]) -> ApartmentState {
    ApartmentState {
        aqi: AqiState {
            temp: 22.5,
            humd: 45,
            co2: 500,
            battery: 90,
        },
        switches: rooms
            .iter()
            .map(|room| (room.to_string(), wall_switch()))
            .collect(),
        socket: SocketState {
            voltage: 235.0,
            current: 210,
            active_power: 20,
            power_consumption: 91_000,
            power_factor: 80,
            socket_status: 1,
        },
        curtain: CurtainState {
            battery: 70,
            curtainstate: 40,
        },
        people_counter: PeopleCounterState {
            total_in: 10,
            total_out: 4,
            period_in: 2,
            period_out: 1,
            battery: 60,
            temperature: 24.0,
            count: 6,
        },
        circuit_breaker: circuit_breaker(),
        water_meter: MeterState {
            device_type: "WATER_METER".to_string(),
            id: format!("{apartment_id}_water"),
            volume: 12.5,
            valve_state: 0,
            battery: 80,
            low_power: false,
            alarm: false,
            communication_error: Some(false),
        },
        gas_meter: MeterState {
            device_type: "GAS_METER".to_string(),
            id: format!("{apartment_id}_gas"),
            volume: 30.25,
            valve_state: 0,
            battery: 75,
            low_power: false,
            alarm: false,
            communication_error: None,
        },
        door_lock: DoorLockState {
            id: format!("{apartment_id}_door"),
            battery: 88,
            t: "2025-01-01T00:00:00.000000+00:00".to_string(),
            remote_lock: 0,
            unlock_record: 0,
            alarm: 0,
            auto_relock: 0,
            auto_relock_enabled: true,
            current_status: 1,
            normally_open_mode: 0,
            tamper: 0,
            reporting_time: 3600,
            last_access_method: String::new(),
            last_access_user_id: 0,
            last_access_timestamp: String::new(),
            last_manage_action: String::new(),
            last_manage_user_id: 0,
        },
        thermostat: ThermostatState {
            temperature: 22.0,
            humidity: 40,
            setpoint_temperature: 24.0,
            mode: ThermostatMode::Cool,
            status: "home".to_string(),
            fan_setting: FanSetting::Auto,
            valve_status: 0,
            fan_status: FanSetting::Auto,
            co2: 450,
            power: PowerState::On,
            last_setpoint_timestamp: "2025-01-01T00:00:00.000000+00:00".to_string(),
        },
    }
}
