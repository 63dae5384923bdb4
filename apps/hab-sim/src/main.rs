//! hab-sim 进程入口：加载配置 → 初始化存储 → 启动仿真任务 → 提供 HTTP 接口。

use chrono::Utc;
use hab_bus::{BusPublisher, MqttBus, MqttBusConfig, NoopBus};
use hab_config::AppConfig;
use hab_control::{ControlConfig, ControlService};
use hab_sim::{AppState, build_app};
use hab_simulation::SimulationEngine;
use hab_simulation::seed::seed_site;
use hab_storage::DeviceStateStore;
use hab_telemetry::init_tracing;
use hab_uplink::{UplinkConfig, UplinkReporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let site = Arc::new(config.load_site()?);
    let mut rng = StdRng::from_entropy();
    let store = Arc::new(DeviceStateStore::new(seed_site(&site, &mut rng, Utc::now())));

    // MQTT 关闭时使用空发布器，便于本地调试
    let (bus, mqtt_handle) = if config.mqtt_enabled {
        let (bus, handle) = MqttBus::connect(MqttBusConfig {
            host: config.mqtt_host.clone(),
            port: config.mqtt_port,
            username: config.mqtt_username.clone(),
            password: config.mqtt_password.clone(),
            qos: config.mqtt_qos,
        });
        let bus: Arc<dyn BusPublisher> = Arc::new(bus);
        (bus, Some(handle))
    } else {
        warn!(target: "hab.sim", "mqtt disabled; telemetry and commands are dropped");
        let bus: Arc<dyn BusPublisher> = Arc::new(NoopBus);
        (bus, None)
    };

    let reporter = UplinkReporter::new(
        UplinkConfig {
            topic_prefix: config.uplink_topic_prefix.clone(),
            republish_delay: config.republish_delay(),
        },
        Arc::clone(&store),
        Arc::clone(&site),
        Arc::clone(&bus),
    );
    let control = ControlService::new(
        ControlConfig {
            downlink_topic_prefix: config.downlink_topic_prefix.clone(),
            fport: config.lorawan_fport,
        },
        Arc::clone(&store),
        Arc::clone(&site),
        bus,
        reporter.clone(),
    );

    let engine = Arc::new(SimulationEngine::new(
        Arc::clone(&site),
        Arc::clone(&store),
        reporter.clone(),
        config.tick_interval(),
    ));
    let routines = engine.spawn();

    let app = build_app(AppState { store, control });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        target: "hab.sim",
        http_addr = %config.http_addr,
        apartments = site.apartments.len(),
        "server_started"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 停止仿真任务并取消所有未完成的延迟上报
    reporter.shutdown().await;
    for routine in routines {
        if let Err(err) = routine.await {
            warn!(target: "hab.sim", error = %err, "simulation_join_failed");
        }
    }
    if let Some(handle) = mqtt_handle {
        handle.abort();
    }
    info!(target: "hab.sim", "server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: "hab.sim", error = %err, "shutdown_signal_failed");
    }
}
