use crate::ControlError;
use crate::params::{self, ControlParams};
use chrono::Utc;
use domain::{ApartmentConfig, DeviceCategory, DeviceSnapshot, SiteConfig};
use hab_bus::BusPublisher;
use hab_protocol::command;
use hab_protocol::{DownlinkEnvelope, Frame, MeterKind, downlink_topic};
use hab_storage::{ApartmentRecords, DeviceStateStore, StorageError};
use hab_telemetry::{
    record_control_accepted, record_control_rejected, record_downlink_failed,
    record_downlink_published,
};
use hab_uplink::UplinkReporter;
use std::sync::Arc;
use tracing::{info, warn};

/// 控制链路配置。
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub downlink_topic_prefix: String,
    pub fport: u8,
}

/// 已发布的一帧。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    pub topic: String,
    pub frame: Frame,
}

/// 一次控制请求的结果。
#[derive(Debug, Clone)]
pub struct ControlOutcome {
    pub status: String,
    pub commands: Vec<SentCommand>,
    /// 变更后的设备快照（释放锁之前取得）。
    pub new_state: DeviceSnapshot,
}

/// 状态变更完成、等待发布的中间结果。
struct Applied {
    frames: Vec<Frame>,
    new_state: DeviceSnapshot,
}

impl Applied {
    fn new(frames: Vec<Frame>, new_state: DeviceSnapshot) -> Self {
        Self { frames, new_state }
    }
}

#[derive(Clone)]
pub struct ControlService {
    store: Arc<DeviceStateStore>,
    site: Arc<SiteConfig>,
    bus: Arc<dyn BusPublisher>,
    reporter: UplinkReporter,
    config: ControlConfig,
}

impl ControlService {
    pub fn new(
        config: ControlConfig,
        store: Arc<DeviceStateStore>,
        site: Arc<SiteConfig>,
        bus: Arc<dyn BusPublisher>,
        reporter: UplinkReporter,
    ) -> Self {
        Self {
            store,
            site,
            bus,
            reporter,
            config,
        }
    }

    /// 处理一次控制请求。墙壁开关必须带房间。
    pub async fn apply(
        &self,
        apartment_id: &str,
        category: DeviceCategory,
        room: Option<&str>,
        params: &ControlParams,
    ) -> Result<ControlOutcome, ControlError> {
        let result = self.dispatch(apartment_id, category, room, params).await;
        match &result {
            Ok(outcome) => {
                record_control_accepted();
                info!(
                    target: "hab.control",
                    apartment_id = %apartment_id,
                    category = %category,
                    commands = outcome.commands.len(),
                    "control_applied"
                );
            }
            Err(err) => {
                record_control_rejected();
                warn!(
                    target: "hab.control",
                    apartment_id = %apartment_id,
                    category = %category,
                    error = %err,
                    "control_rejected"
                );
            }
        }
        result
    }

    async fn dispatch(
        &self,
        apartment_id: &str,
        category: DeviceCategory,
        room: Option<&str>,
        params: &ControlParams,
    ) -> Result<ControlOutcome, ControlError> {
        let apartment = self
            .site
            .apartment(apartment_id)
            .ok_or_else(|| StorageError::ApartmentNotFound(apartment_id.to_string()))?;
        let records = self.store.apartment(apartment_id)?;
        let room = room.filter(|_| category == DeviceCategory::WallSwitch);

        let (applied, status) = match category {
            DeviceCategory::WallSwitch => {
                let Some(room) = room else {
                    return Err(ControlError::invalid("room is required for switch"));
                };
                let cell = records.switch(room)?;
                let intent = params::switch_intent(params)?;
                let applied = cell.mutate(|state| {
                    let frame = command::apply_switch(state, &intent);
                    Applied::new(vec![frame], DeviceSnapshot::WallSwitch(state.clone()))
                });
                (applied, StatusLine::Published("Switch updated"))
            }
            DeviceCategory::Socket => {
                let on = params::socket_intent(params)?;
                let applied = records.socket().mutate(|state| {
                    let frame = command::apply_socket(state, on);
                    Applied::new(vec![frame], DeviceSnapshot::Socket(state.clone()))
                });
                (applied, StatusLine::Published("Socket updated"))
            }
            DeviceCategory::Curtain => {
                let position = params::curtain_intent(params)?;
                let applied = records.curtain().mutate(|state| {
                    let frame = command::apply_curtain(state, position);
                    Applied::new(vec![frame], DeviceSnapshot::Curtain(state.clone()))
                });
                (applied, StatusLine::CurtainMoved(position.get()))
            }
            DeviceCategory::CircuitBreaker => {
                let on = params::circuit_breaker_intent(params)?;
                let applied = records.circuit_breaker().mutate(|state| {
                    let frame = command::apply_circuit_breaker(state, on);
                    Applied::new(vec![frame], DeviceSnapshot::CircuitBreaker(state.clone()))
                });
                let action = if on { "on" } else { "off" };
                (applied, StatusLine::Fixed(format!("scb {action} command sent")))
            }
            DeviceCategory::WaterMeter | DeviceCategory::GasMeter => {
                self.valve(records, category, params)?
            }
            DeviceCategory::Thermostat => {
                let intent = params::thermostat_intent(params)?;
                let now = Utc::now();
                let applied = records.thermostat().mutate(|state| {
                    let frames = command::apply_thermostat(state, &intent, now);
                    Applied::new(frames, DeviceSnapshot::Thermostat(state.clone()))
                });
                (applied, StatusLine::Fixed("commands sent".to_string()))
            }
            DeviceCategory::DoorLock => {
                let action = params::door_lock_action(params)?;
                let now = Utc::now();
                let applied = records.door_lock().mutate(|state| {
                    let frames = command::apply_door_lock(state, &action, now)
                        .into_iter()
                        .collect();
                    Applied::new(frames, DeviceSnapshot::DoorLock(state.clone()))
                });
                let status = match action.name() {
                    "access_event" => "access_event recorded",
                    "set_auto_relock" => "auto_relock updated",
                    _ => "command sent",
                };
                (applied, StatusLine::Fixed(status.to_string()))
            }
            DeviceCategory::Aqi | DeviceCategory::PeopleCounter => {
                return Err(ControlError::invalid(format!(
                    "{category} does not accept control commands"
                )));
            }
        };

        let device_id = apartment.device_id(category, room);
        let commands = self.publish_frames(apartment, &device_id, applied.frames).await?;
        self.reporter.report_later(apartment_id, category, room);
        Ok(ControlOutcome {
            status: status.render(&commands),
            commands,
            new_state: applied.new_state,
        })
    }

    fn valve(
        &self,
        records: &ApartmentRecords,
        category: DeviceCategory,
        params: &ControlParams,
    ) -> Result<(Applied, StatusLine), ControlError> {
        let action = params::valve_intent(params)?;
        let (kind, cell) = match category {
            DeviceCategory::GasMeter => (MeterKind::Gas, records.gas_meter()),
            _ => (MeterKind::Water, records.water_meter()),
        };
        let applied = cell.mutate(|state| {
            let frame = command::apply_valve(state, kind, action);
            let snapshot = match kind {
                MeterKind::Water => DeviceSnapshot::WaterMeter(state.clone()),
                MeterKind::Gas => DeviceSnapshot::GasMeter(state.clone()),
            };
            Applied::new(vec![frame], snapshot)
        });
        let status = format!("{} valve {}", kind.as_str(), action.label());
        Ok((applied, StatusLine::Fixed(status)))
    }

    /// 逐帧发布；遇到第一条失败即停止。
    async fn publish_frames(
        &self,
        apartment: &ApartmentConfig,
        device_id: &str,
        frames: Vec<Frame>,
    ) -> Result<Vec<SentCommand>, ControlError> {
        let topic = downlink_topic(&self.config.downlink_topic_prefix, device_id);
        let mut sent = Vec::with_capacity(frames.len());
        for frame in frames {
            let payload = DownlinkEnvelope::new(&frame, self.config.fport)
                .to_json()
                .map_err(|err| ControlError::Dispatch(err.to_string()))?;
            info!(
                target: "hab.control",
                apartment_id = %apartment.id,
                device_id = %device_id,
                topic = %topic,
                frame = %frame.to_hex(),
                payload_size = payload.len(),
                "downlink_publish"
            );
            if let Err(err) = self.bus.publish(&topic, payload).await {
                record_downlink_failed();
                warn!(
                    target: "hab.control",
                    device_id = %device_id,
                    topic = %topic,
                    error = %err,
                    "downlink_publish_failed"
                );
                return Err(ControlError::Dispatch(err.to_string()));
            }
            record_downlink_published();
            sent.push(SentCommand {
                topic: topic.clone(),
                frame,
            });
        }
        Ok(sent)
    }
}

/// 响应中的 `status` 文本。带下行帧的请求引用第一条帧与 topic。
enum StatusLine {
    Published(&'static str),
    CurtainMoved(u8),
    Fixed(String),
}

impl StatusLine {
    fn render(self, commands: &[SentCommand]) -> String {
        let published = commands.first().map(|sent| {
            format!(
                "command {} published to {}",
                sent.frame.to_base64(),
                sent.topic
            )
        });
        match (self, published) {
            (StatusLine::Published(prefix), Some(published)) => format!("{prefix}, {published}"),
            (StatusLine::CurtainMoved(position), Some(published)) => {
                format!("Curtain updated to {position}, {published}")
            }
            (StatusLine::Published(prefix), None) => prefix.to_string(),
            (StatusLine::CurtainMoved(position), None) => format!("Curtain updated to {position}"),
            (StatusLine::Fixed(status), _) => status,
        }
    }
}
