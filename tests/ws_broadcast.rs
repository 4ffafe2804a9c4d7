//! End-to-end broadcast behaviour over real WebSocket connections.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use futures_util::SinkExt;
use tokio_test::assert_ok;
use tokio_tungstenite::tungstenite::Message;

use common::{connect, next_text, start_server, test_config, wait_for_live};
use websocket_stress::hub::Hub;
use websocket_stress::service::LoadGenerator;

#[tokio::test]
async fn broadcast_reaches_every_client_until_it_leaves() {
    let (hub, _hub_task) = Hub::spawn(64);
    let addr = start_server(hub.clone(), test_config()).await;
    let generator = LoadGenerator::new(hub.clone(), Duration::from_secs(60), 256);

    let mut c1 = connect(addr).await;
    let mut c2 = connect(addr).await;
    let mut c3 = connect(addr).await;
    wait_for_live(&hub, 3).await;

    let p = assert_ok!(generator.tick().await);
    for client in [&mut c1, &mut c2, &mut c3] {
        let Some(text) = next_text(client).await else {
            panic!("client should receive P");
        };
        assert_eq!(text, p.frame().as_str());
        assert!(text.contains("| Connected clients: 3 | Payload size: 256 bytes\n"));
    }

    assert_ok!(c2.close(None).await);
    wait_for_live(&hub, 2).await;

    let q = assert_ok!(generator.tick().await);
    assert!(q.header().contains("Connected clients: 2"));
    for client in [&mut c1, &mut c3] {
        let Some(text) = next_text(client).await else {
            panic!("remaining clients should receive Q");
        };
        assert_eq!(text, q.frame().as_str());
    }

    let stats = assert_ok!(hub.stats().await);
    assert_eq!(stats.total_registered, 3);
    assert_eq!(stats.total_unregistered, 1);
    assert_eq!(stats.deliveries, 5);
}

#[tokio::test]
async fn dropped_client_is_removed() {
    let (hub, _hub_task) = Hub::spawn(64);
    let addr = start_server(hub.clone(), test_config()).await;

    let client = connect(addr).await;
    wait_for_live(&hub, 1).await;
    drop(client);
    wait_for_live(&hub, 0).await;

    let stats = assert_ok!(hub.stats().await);
    assert_eq!(stats.total_unregistered, 1);
}

#[tokio::test]
async fn client_messages_are_ignored() {
    let (hub, _hub_task) = Hub::spawn(64);
    let addr = start_server(hub.clone(), test_config()).await;

    let mut client = connect(addr).await;
    wait_for_live(&hub, 1).await;
    assert_ok!(client.send(Message::Text("hello".into())).await);
    assert_ok!(client.send(Message::Ping(Vec::new().into())).await);

    let generator = LoadGenerator::new(hub.clone(), Duration::from_secs(60), 32);
    let p = assert_ok!(generator.tick().await);
    let Some(text) = next_text(&mut client).await else {
        panic!("client should still receive broadcasts");
    };
    assert_eq!(text, p.frame().as_str());
    assert_eq!(hub.live_count(), 1);
}

#[tokio::test]
async fn periodic_generator_streams_to_clients() {
    let (hub, _hub_task) = Hub::spawn(64);
    let addr = start_server(hub.clone(), test_config()).await;

    let mut client = connect(addr).await;
    wait_for_live(&hub, 1).await;
    let generator = LoadGenerator::new(hub.clone(), Duration::from_millis(20), 512).spawn();

    for _ in 0..3 {
        let Some(text) = next_text(&mut client).await else {
            panic!("expected periodic payload");
        };
        let Some((header, filler)) = text.split_once('\n') else {
            panic!("payload must contain a header line");
        };
        assert!(header.ends_with("| Connected clients: 1 | Payload size: 512 bytes"));
        assert_eq!(filler.len(), 512);
    }
    generator.abort();
}

#[tokio::test]
async fn closed_hub_refuses_upgrade() {
    let (hub, handle) = Hub::new(4);
    drop(hub);
    let addr = start_server(handle, test_config()).await;

    let result = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await;
    let Err(tokio_tungstenite::tungstenite::Error::Http(response)) = result else {
        panic!("upgrade should be refused with an HTTP error");
    };
    assert_eq!(response.status().as_u16(), 503);
}
