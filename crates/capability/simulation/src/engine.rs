use crate::perturb;
use chrono::{DateTime, Utc};
use domain::{DeviceCategory, DeviceSnapshot, SiteConfig};
use hab_storage::{ApartmentRecords, DeviceStateStore};
use hab_telemetry::record_simulation_tick;
use hab_uplink::UplinkReporter;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

/// 仿真引擎：持有站点、存储与上报器。
pub struct SimulationEngine {
    site: Arc<SiteConfig>,
    store: Arc<DeviceStateStore>,
    reporter: UplinkReporter,
    tick_interval: Duration,
}

impl SimulationEngine {
    pub fn new(
        site: Arc<SiteConfig>,
        store: Arc<DeviceStateStore>,
        reporter: UplinkReporter,
        tick_interval: Duration,
    ) -> Self {
        Self {
            site,
            store,
            reporter,
            tick_interval,
        }
    }

    /// 每类设备启动一个周期任务，直到上报器的取消信号触发。
    pub fn spawn(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        DeviceCategory::ALL
            .into_iter()
            .map(|category| {
                let engine = Arc::clone(&self);
                tokio::spawn(async move { engine.run(category).await })
            })
            .collect()
    }

    async fn run(&self, category: DeviceCategory) {
        let cancel = self.reporter.cancellation_token();
        let mut rng = StdRng::from_entropy();
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            target: "hab.sim",
            category = %category,
            interval_seconds = self.tick_interval.as_secs(),
            "simulation_started"
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            self.tick(category, &mut rng, Utc::now()).await;
        }
        info!(target: "hab.sim", category = %category, "simulation_stopped");
    }

    /// 对所有公寓执行一次该类设备的扰动并上报。
    pub async fn tick<R: Rng + Send + ?Sized>(
        &self,
        category: DeviceCategory,
        rng: &mut R,
        now: DateTime<Utc>,
    ) {
        record_simulation_tick();
        for apartment in &self.site.apartments {
            let records = match self.store.apartment(&apartment.id) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        target: "hab.sim",
                        apartment_id = %apartment.id,
                        error = %err,
                        "simulation_apartment_missing"
                    );
                    continue;
                }
            };
            for (room, snapshot) in step(records, category, rng, now) {
                let device_id = apartment.device_id(category, room.as_deref());
                // 发布失败已由上报器记录，不影响下一台设备。
                let _ = self.reporter.publish_snapshot(&device_id, &snapshot).await;
            }
        }
    }
}

/// 持锁扰动，返回释放锁之后待上报的快照（墙壁开关每个房间一份）。
fn step<R: Rng + ?Sized>(
    records: &ApartmentRecords,
    category: DeviceCategory,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<(Option<String>, DeviceSnapshot)> {
    let snapshot = match category {
        DeviceCategory::WallSwitch => {
            return records
                .switches()
                .map(|(room, cell)| {
                    let state = cell.mutate(|state| {
                        perturb::wall_switch(state, rng);
                        state.clone()
                    });
                    (Some(room.to_string()), DeviceSnapshot::WallSwitch(state))
                })
                .collect();
        }
        DeviceCategory::Aqi => DeviceSnapshot::Aqi(records.aqi().mutate(|state| {
            perturb::aqi(state, rng);
            state.clone()
        })),
        DeviceCategory::Socket => DeviceSnapshot::Socket(records.socket().mutate(|state| {
            perturb::socket(state, rng);
            state.clone()
        })),
        DeviceCategory::Curtain => DeviceSnapshot::Curtain(records.curtain().mutate(|state| {
            perturb::curtain(state, rng);
            state.clone()
        })),
        DeviceCategory::PeopleCounter => {
            DeviceSnapshot::PeopleCounter(records.people_counter().mutate(|state| {
                perturb::people_counter(state, rng);
                state.clone()
            }))
        }
        DeviceCategory::CircuitBreaker => {
            DeviceSnapshot::CircuitBreaker(records.circuit_breaker().mutate(|state| {
                perturb::circuit_breaker(state, rng);
                state.clone()
            }))
        }
        DeviceCategory::WaterMeter => {
            DeviceSnapshot::WaterMeter(records.water_meter().mutate(|state| {
                perturb::water_meter(state, rng);
                state.clone()
            }))
        }
        DeviceCategory::GasMeter => DeviceSnapshot::GasMeter(records.gas_meter().mutate(|state| {
            perturb::gas_meter(state, rng);
            state.clone()
        })),
        DeviceCategory::DoorLock => DeviceSnapshot::DoorLock(records.door_lock().mutate(|state| {
            perturb::door_lock(state, rng, now);
            state.clone()
        })),
        DeviceCategory::Thermostat => {
            DeviceSnapshot::Thermostat(records.thermostat().mutate(|state| {
                perturb::thermostat(state, rng);
                state.clone()
            }))
        }
    };
    vec![(None, snapshot)]
}
