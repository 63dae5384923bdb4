//! MQTT 主题约定。

/// `{prefix}/{device_id}/uplink`
pub fn uplink_topic(prefix: &str, device_id: &str) -> String {
    format!("{}/{}/uplink", prefix.trim_end_matches('/'), device_id)
}

/// `{prefix}/{device_id}`
pub fn downlink_topic(prefix: &str, device_id: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), device_id)
}
