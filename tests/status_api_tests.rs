use std::sync::Arc;
use std::time::Duration;
use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use rw_status::brokers::remote_write::{
    QueueRegistry, RemoteWriteQueue, RemoteWriteRegistry, ShardingSnapshot, StoreClient,
};
use rw_status::dashboard::models::remote_write::RemoteWriteCollection;

mod helpers;
use helpers::{queue_config, scenario_registry, setup_server, standalone_queue, StaticRegistry};

const STATUS_PATH: &str = "/api/v1/status/remote_write";

#[cfg(test)]
mod status_api_tests {
    use super::*;

    // =========================================================================================
    // 1. AGGREGATE ENDPOINT
    // =========================================================================================

    mod aggregate {
        use super::*;

        #[tokio::test]
        async fn test_two_queue_scenario() {
            let server = setup_server(scenario_registry());

            let response = server.get(STATUS_PATH).await;
            response.assert_status_ok();

            let body: Value = response.json();
            assert_eq!(body["status"], "success");
            assert!(body.get("warnings").is_none(), "no warnings expected: {body}");

            let queues = body["data"]["queues"].as_array().unwrap();
            assert_eq!(queues.len(), 2);

            assert_eq!(queues[0]["name"], "A");
            assert_eq!(queues[0]["endpoint"], "http://a");
            assert_eq!(queues[0]["shardsMax"], 10);
            assert_eq!(queues[0]["shardsMin"], 1);
            assert_eq!(queues[0]["shardsCurrent"], 3);
            assert_eq!(queues[0]["isResharding"], false);
            assert_eq!(queues[0]["shards"].as_array().unwrap().len(), 3);

            assert_eq!(queues[1]["name"], "B");
            assert_eq!(queues[1]["endpoint"], "http://b");
            assert_eq!(queues[1]["shardsCurrent"], 1);
            assert_eq!(queues[1]["isResharding"], true);
        }

        #[tokio::test]
        async fn test_empty_registry() {
            let server = setup_server(Arc::new(RemoteWriteRegistry::new()));

            let response = server.get(STATUS_PATH).await;
            response.assert_status_ok();

            let body: Value = response.json();
            assert_eq!(body["data"]["queues"], serde_json::json!([]));
            assert!(body.get("warnings").is_none());
        }

        #[tokio::test]
        async fn test_live_values_are_reported() {
            let registry = Arc::new(RemoteWriteRegistry::new());
            let queue = registry.register(StoreClient::new("primary", "http://p/write"), queue_config(2, 4));

            let last_ran = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap() + chrono::Duration::microseconds(250_001);
            queue.update_sharding_calculations(ShardingSnapshot {
                last_ran,
                desired_shards: 3.0,
                samples_in_rate: 2048.5,
                samples_kept_ratio: 1.0,
                ..Default::default()
            });
            let shard = queue.shard(1).unwrap();
            shard.enqueue(300);
            shard.record_send(100, Duration::from_millis(75), Err("server returned HTTP status 429".to_string()));

            let server = setup_server(registry);
            let body: Value = server.get(STATUS_PATH).await.json();
            let collection: RemoteWriteCollection = serde_json::from_value(body["data"].clone()).unwrap();

            let status = &collection.queues[0];
            assert_eq!(status.sharding_calculations.last_ran, last_ran);
            assert_eq!(status.sharding_calculations.desired_shards, 3.0);
            assert_eq!(status.sharding_calculations.samples_in_rate, 2048.5);
            assert_eq!(status.shards.len(), 2);
            assert_eq!(status.shards[0].pending_samples, 0);
            assert_eq!(status.shards[0].last_sent_time, DateTime::<Utc>::UNIX_EPOCH);
            assert_eq!(status.shards[1].pending_samples, 200);
            assert_eq!(status.shards[1].last_error, "server returned HTTP status 429");
            assert_eq!(status.shards[1].last_sent_duration, 0.075);

            assert!(body["data"]["queues"][0]["shardingCalculations"]["desiredShards"].is_number());
        }

        #[tokio::test]
        async fn test_out_of_bounds_shard_count_is_passed_through() {
            let registry = Arc::new(RemoteWriteRegistry::new());
            let queue = registry.register(StoreClient::new("over", "http://over"), queue_config(2, 3));
            queue.begin_reshard();
            queue.finish_reshard(7);

            let server = setup_server(registry);
            let response = server.get(STATUS_PATH).await;
            response.assert_status_ok();

            let body: Value = response.json();
            assert!(body.get("warnings").is_none());
            let status = &body["data"]["queues"][0];
            assert_eq!(status["shardsCurrent"], 7);
            assert_eq!(status["shardsMin"], 2);
            assert_eq!(status["shardsMax"], 3);
        }
    }

    // =========================================================================================
    // 2. PARTIAL AND FATAL FAILURES
    // =========================================================================================

    mod failures {
        use super::*;

        #[tokio::test]
        async fn test_stopped_queue_becomes_warning() {
            let first = standalone_queue("First");
            let gone = standalone_queue("Gone");
            let last = standalone_queue("Last");
            gone.stop();

            let queues: Vec<Arc<dyn RemoteWriteQueue>> = vec![
                first as Arc<dyn RemoteWriteQueue>,
                gone as Arc<dyn RemoteWriteQueue>,
                last as Arc<dyn RemoteWriteQueue>,
            ];
            let server = setup_server(Arc::new(StaticRegistry(queues)));

            let response = server.get(STATUS_PATH).await;
            response.assert_status_ok();

            let body: Value = response.json();
            assert_eq!(body["status"], "success");
            let names: Vec<&str> = body["data"]["queues"]
                .as_array()
                .unwrap()
                .iter()
                .map(|q| q["name"].as_str().unwrap())
                .collect();
            assert_eq!(names, vec!["First", "Last"]);

            let warnings = body["warnings"].as_array().unwrap();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].as_str().unwrap().contains("stopped"));
        }

        #[tokio::test]
        async fn test_closed_registry_is_server_error() {
            let registry = scenario_registry();
            registry.close();
            let server = setup_server(registry);

            let response = server.get(STATUS_PATH).await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

            let body: Value = response.json();
            assert_eq!(body["status"], "error");
            assert_eq!(body["errorType"], "internal");
            assert!(body.get("data").is_none());
            assert!(body["error"].as_str().unwrap().contains("unavailable"));
        }

        #[tokio::test]
        async fn test_removed_queue_disappears() {
            let registry = scenario_registry();
            registry.remove("A");
            let server = setup_server(registry.clone() as Arc<dyn QueueRegistry>);

            let body: Value = server.get(STATUS_PATH).await.json();
            assert_eq!(body["data"]["queues"].as_array().unwrap().len(), 1);
            assert_eq!(body["data"]["queues"][0]["name"], "B");
        }
    }

    // =========================================================================================
    // 3. SINGLE QUEUE & HEALTH
    // =========================================================================================

    mod single {
        use super::*;

        #[tokio::test]
        async fn test_get_one_queue() {
            let server = setup_server(scenario_registry());

            let response = server.get(&format!("{STATUS_PATH}/B")).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"]["name"], "B");
            assert_eq!(body["data"]["isResharding"], true);
        }

        #[tokio::test]
        async fn test_unknown_queue_is_not_found() {
            let server = setup_server(scenario_registry());

            let response = server.get(&format!("{STATUS_PATH}/missing")).await;
            response.assert_status(StatusCode::NOT_FOUND);
            let body: Value = response.json();
            assert_eq!(body["errorType"], "not_found");
        }

        #[tokio::test]
        async fn test_health() {
            let server = setup_server(Arc::new(RemoteWriteRegistry::new()));
            let response = server.get("/health").await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["status"], "ok");
        }
    }
}
