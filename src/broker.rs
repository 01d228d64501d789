//! Move exchange with a game broker.
//!
//! The broker relays moves between two independently running players. Every
//! message carries the turn number it belongs to, and a received move is only
//! played when it is for the turn about to be played.

use crate::board::{Coord, CoordPair};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerCoord {
    pub row: i32,
    pub col: i32,
}

impl From<Coord> for BrokerCoord {
    fn from(coord: Coord) -> Self {
        BrokerCoord {
            row: coord.row,
            col: coord.col,
        }
    }
}

impl From<BrokerCoord> for Coord {
    fn from(coord: BrokerCoord) -> Self {
        Coord::new(coord.row, coord.col)
    }
}

/// `{"from": {"row", "col"}, "to": {"row", "col"}, "turn"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMove {
    pub from: BrokerCoord,
    pub to: BrokerCoord,
    pub turn: u32,
}

impl BrokerMove {
    pub fn new(mv: &CoordPair, turn: u32) -> Self {
        BrokerMove {
            from: mv.src.into(),
            to: mv.dst.into(),
            turn,
        }
    }

    pub fn coords(&self) -> CoordPair {
        CoordPair::new(self.from.into(), self.to.into())
    }

    /// The move, if it is the one for the turn after `turns_played`.
    pub fn accept_for(&self, turns_played: u32) -> Option<CoordPair> {
        (self.turn == turns_played + 1).then(|| self.coords())
    }
}

/// Envelope of every broker reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<BrokerMove>,
}

#[cfg(feature = "broker")]
pub use client::BrokerClient;

#[cfg(feature = "broker")]
mod client {
    use super::{BrokerMove, BrokerResponse};
    use crate::board::CoordPair;
    use crate::error::{GameError, GameResult};
    use reqwest::blocking::Client;
    use reqwest::header::ACCEPT;
    use tracing::{debug, warn};

    /// Blocking HTTP client for a broker URL.
    pub struct BrokerClient {
        url: String,
        client: Client,
    }

    impl BrokerClient {
        pub fn new(url: impl Into<String>) -> Self {
            BrokerClient {
                url: url.into(),
                client: Client::new(),
            }
        }

        /// Publish our move for `turn`. The broker must echo it back.
        pub fn post_move(&self, mv: &CoordPair, turn: u32) -> GameResult<()> {
            let data = BrokerMove::new(mv, turn);
            let response = self
                .client
                .post(&self.url)
                .json(&data)
                .send()
                .inspect_err(|err| warn!(%err, url = %self.url, "broker unreachable"))?;
            let status = response.status();
            let body: BrokerResponse = response
                .json()
                .inspect_err(|err| warn!(%err, %status, "unreadable broker reply"))?;
            if status.is_success() && body.success && body.data == Some(data) {
                debug!(%mv, turn, "sent move to broker");
                Ok(())
            } else {
                warn!(%status, ?body, "broker rejected move");
                Err(GameError::Broker {
                    message: format!("status code: {status}, response: {body:?}"),
                })
            }
        }

        /// Latest move on the broker, if it is for the turn after `turns_played`.
        pub fn fetch_move(&self, turns_played: u32) -> GameResult<Option<CoordPair>> {
            let response = self
                .client
                .get(&self.url)
                .header(ACCEPT, "application/json")
                .send()
                .inspect_err(|err| warn!(%err, url = %self.url, "broker unreachable"))?;
            let status = response.status();
            let body: BrokerResponse = response
                .json()
                .inspect_err(|err| warn!(%err, %status, "unreadable broker reply"))?;
            if !status.is_success() || !body.success {
                warn!(%status, ?body, "broker error");
                return Err(GameError::Broker {
                    message: format!("status code: {status}, response: {body:?}"),
                });
            }
            let mv = body.data.and_then(|data| data.accept_for(turns_played));
            if let Some(mv) = mv {
                debug!(%mv, "got move from broker");
            }
            Ok(mv)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_shape() {
        let mv = CoordPair::from_quad(4, 2, 3, 2);
        let json = serde_json::to_value(BrokerMove::new(&mv, 7)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": {"row": 4, "col": 2},
                "to": {"row": 3, "col": 2},
                "turn": 7
            })
        );
    }

    #[test]
    fn test_only_next_turn_is_accepted() {
        let reply: BrokerResponse = serde_json::from_str(
            r#"{"success": true, "data": {"from": {"row": 0, "col": 1}, "to": {"row": 1, "col": 1}, "turn": 4}}"#,
        )
        .unwrap();
        let data = reply.data.unwrap();
        assert_eq!(data.accept_for(3), Some(CoordPair::from_quad(0, 1, 1, 1)));
        assert_eq!(data.accept_for(4), None);
        assert_eq!(data.accept_for(2), None);
    }

    #[test]
    fn test_reply_without_data() {
        let reply: BrokerResponse = serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.data, None);
        let bare: BrokerResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!bare.success);
    }

    #[cfg(feature = "broker")]
    #[test]
    fn test_unreachable_broker_is_an_error() {
        use crate::error::GameError;

        // Nothing listens on port 1.
        let client = BrokerClient::new("http://127.0.0.1:1/");
        assert!(matches!(client.fetch_move(0), Err(GameError::Http(_))));
        let mv = CoordPair::from_quad(4, 2, 3, 2);
        assert!(matches!(client.post_move(&mv, 1), Err(GameError::Http(_))));
    }
}
