//! Full client runs against TCP mock targets.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map};

use odin_data_client::config::ClientConfig;
use odin_data_client::lifecycle;
use odin_data_client::orchestrator::{FileWriting, RunPlan, SETTLING_POLLS};
use odin_data_client::protocol::IpcMessage;
use odin_data_client::tree::Bitdepth;

mod common;

type Received = Arc<Mutex<Vec<IpcMessage>>>;

async fn start_recording_target(addr: SocketAddr, name: &'static str) -> Received {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    common::start_mock_target(addr, move |request| {
        sink.lock().unwrap().push(request.clone());
        let params = match request.msg_val.as_str() {
            "status" => {
                let mut params = Map::new();
                params.insert("shared_memory".into(), json!({"configured": true, "target": name}));
                Some(params)
            }
            _ => None,
        };
        Some(request.ack(params))
    })
    .await;
    received
}

fn config_for(receiver: SocketAddr, processor: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.endpoints.receiver = format!("tcp://{}", receiver);
    config.endpoints.processor = format!("tcp://{}", processor);
    config.timeout_ms = 500;
    config
}

fn command_names(received: &Received) -> Vec<String> {
    received
        .lock()
        .unwrap()
        .iter()
        .map(|m| m.msg_val.clone())
        .collect()
}

#[tokio::test]
async fn test_full_run_over_tcp() {
    let receiver_addr: SocketAddr = "127.0.0.1:28311".parse().unwrap();
    let processor_addr: SocketAddr = "127.0.0.1:28312".parse().unwrap();
    let receiver = start_recording_target(receiver_addr, "receiver").await;
    let processor = start_recording_target(processor_addr, "processor").await;

    let mut orchestrator = lifecycle::connect(&config_for(receiver_addr, processor_addr))
        .await
        .expect("Targets unreachable");

    let plan = RunPlan {
        defaults: Some(
            r#"{"processor_default_config": {"fr_setup": {"fr_ready_cnxn": "tcp://127.0.0.1:5001"}},
                "processor_plugins": [{"plugin": {"load": {"index": "excalibur"}}}]}"#
                .into(),
        ),
        bitdepth: Some(Bitdepth::TwentyFour),
        frames: Some(50),
        configure: true,
        file_writing: Some(FileWriting::Start),
        get_version: true,
        shutdown: true,
        ..Default::default()
    };
    orchestrator.run(&plan).await.unwrap();

    assert_eq!(
        command_names(&receiver),
        vec!["configure", "request_version", "shutdown"]
    );

    let mut expected = vec!["configure".to_string()];
    expected.extend(std::iter::repeat("status".to_string()).take(SETTLING_POLLS));
    expected.extend(
        ["configure", "configure", "configure", "request_version", "configure"]
            .map(String::from),
    );
    assert_eq!(command_names(&processor), expected);

    let processor_msgs = processor.lock().unwrap().clone();
    assert_eq!(
        json!(processor_msgs[0].params.clone().unwrap()),
        json!({"fr_setup": {"fr_ready_cnxn": "tcp://127.0.0.1:5001"}})
    );
    let file_writing = json!(processor_msgs[SETTLING_POLLS + 3].params.clone().unwrap());
    assert_eq!(file_writing["hdf"]["write"], true);
    assert_eq!(file_writing["hdf"]["frames"], 50);
    assert_eq!(file_writing["hdf"]["dataset"]["data"]["datatype"], 2);
    assert_eq!(
        json!(processor_msgs.last().unwrap().params.clone().unwrap()),
        json!({"shutdown": true})
    );

    // Ids are shared across both endpoints and strictly increasing
    let mut ids: Vec<u32> = receiver
        .lock()
        .unwrap()
        .iter()
        .chain(processor_msgs.iter())
        .map(|m| m.id)
        .collect();
    ids.sort_unstable();
    let total = ids.len() as u32;
    assert_eq!(ids, (1..=total).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_receiver_config_sent_whole() {
    let receiver_addr: SocketAddr = "127.0.0.1:28313".parse().unwrap();
    let processor_addr: SocketAddr = "127.0.0.1:28314".parse().unwrap();
    let receiver = start_recording_target(receiver_addr, "receiver").await;
    let _processor = start_recording_target(processor_addr, "processor").await;

    let mut orchestrator = lifecycle::connect(&config_for(receiver_addr, processor_addr))
        .await
        .unwrap();

    let plan = RunPlan {
        defaults: Some(
            r#"{"receiver_default_config": {"decoder_type": "Excalibur", "rx_ports": "61649"}}"#
                .into(),
        ),
        bitdepth: Some(Bitdepth::Six),
        configure: true,
        ..Default::default()
    };
    orchestrator.run(&plan).await.unwrap();

    let received = receiver.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(
        json!(received[0].params.clone().unwrap()),
        json!({
            "decoder_type": "Excalibur",
            "rx_ports": "61649",
            "decoder_config": {"bitdepth": "6-bit"}
        })
    );
}
