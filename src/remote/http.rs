//! HTTP client for the Nautilus robot server

use crate::config::ServerConfig;
use crate::remote::sender::{MovementSender, RemoteError, RemoteResult, RobotControl};
use crate::remote::types::{MoveRequest, RobotState, SpeedRequest};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

pub struct HttpRobotClient {
    http: Client,
    base_url: String,
}

impl HttpRobotClient {
    pub fn new(config: &ServerConfig) -> RemoteResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RemoteError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> RemoteResult<RobotState> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        RobotState::from_response(body)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> RemoteResult<RobotState> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(path, request).await
    }
}

#[async_trait]
impl MovementSender for HttpRobotClient {
    async fn send_move(&self, request: &MoveRequest) -> RemoteResult<RobotState> {
        self.post("/api/move", Some(request)).await
    }

    async fn send_stop(&self) -> RemoteResult<RobotState> {
        self.post::<()>("/api/stop", None).await
    }
}

#[async_trait]
impl RobotControl for HttpRobotClient {
    async fn fetch_status(&self) -> RemoteResult<RobotState> {
        let path = "/api/status";
        self.execute(path, self.http.get(self.url(path))).await
    }

    async fn set_speed(&self, speed: u8) -> RemoteResult<RobotState> {
        let request = SpeedRequest {
            speed: speed.min(100),
        };
        self.post("/api/speed", Some(&request)).await
    }

    async fn toggle_camera(&self) -> RemoteResult<RobotState> {
        self.post::<()>("/api/camera/toggle", None).await
    }

    async fn toggle_servo(&self) -> RemoteResult<RobotState> {
        self.post::<()>("/api/servo/toggle", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::types::Direction;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpRobotClient {
        HttpRobotClient::new(&ServerConfig {
            base_url: server.base_url(),
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_move_posts_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/move")
                    .json_body(json!({"direction": "forward", "intensity": 70, "angle": 90.0}));
                then.status(200).json_body(json!({
                    "status": "success",
                    "direction": "forward",
                    "state": {"is_moving": true, "current_direction": "forward"}
                }));
            })
            .await;

        let client = client_for(&server);
        let request = MoveRequest {
            direction: Direction::Forward,
            intensity: Some(70),
            angle: Some(90.0),
        };
        let state = client.send_move(&request).await.unwrap();

        assert!(state.is_moving);
        assert_eq!(state.current_direction, "forward");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stop_and_status() {
        let server = MockServer::start_async().await;
        let stop = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/stop");
                then.status(200)
                    .json_body(json!({"status": "success", "state": {"is_moving": false}}));
            })
            .await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/status");
                then.status(200)
                    .json_body(json!({"heading": 10.0, "battery": 88, "motor_speed": 65}));
            })
            .await;

        let client = client_for(&server);
        let stopped = client.send_stop().await.unwrap();
        assert!(!stopped.is_moving);

        let state = client.fetch_status().await.unwrap();
        assert_eq!(state.heading, 10.0);
        assert_eq!(state.battery, Some(88.0));
        assert_eq!(state.motor_speed, 65);

        stop.assert_async().await;
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_speed_is_clamped_before_sending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/speed").json_body(json!({"speed": 100}));
                then.status(200)
                    .json_body(json!({"status": "success", "speed": 100, "state": {"motor_speed": 100}}));
            })
            .await;

        let client = client_for(&server);
        let state = client.set_speed(250).await.unwrap();
        assert_eq!(state.motor_speed, 100);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/camera/toggle");
                then.status(503);
            })
            .await;

        let client = client_for(&server);
        let result = client.toggle_camera().await;
        match result {
            Err(RemoteError::Status { status, path }) => {
                assert_eq!(status, 503);
                assert_eq!(path, "/api/camera/toggle");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = HttpRobotClient::new(&ServerConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
        })
        .unwrap();

        let result = client.toggle_servo().await;
        assert!(matches!(result, Err(RemoteError::Http(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpRobotClient::new(&ServerConfig {
            base_url: "http://robot.local:8000/".to_string(),
            request_timeout_ms: 1_000,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://robot.local:8000");
        assert_eq!(client.url("/api/stop"), "http://robot.local:8000/api/stop");
    }
}
