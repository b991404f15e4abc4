//! Drives one game from authentication to quit.
//!
//! The flow is:
//!   1. Authenticate on every river
//!   2. Fetch the cannon inventory on river 0 and build the board
//!   3. Loop: scan all rivers for sightings → fire → clear the board
//!   4. On `gameover` from anywhere, send `quit` on river 0 and stop
//!
//! Failures in steps 1 and 2 end the run with an error. Inside the loop
//! they are logged and the game goes on.

use std::ops::ControlFlow;

use bridgefire_board::{Board, Shot};
use bridgefire_protocol::{
    field, Codec, Fields, JsonCodec, ProtocolError, Request, TurnReport, RIVER_COUNT,
};
use bridgefire_transport::{connect_rivers, Datagram, RiverChannel, UdpDatagram};
use tracing::{debug, info, warn};

use crate::{ClientConfig, ClientError, Phase};

/// How a game ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    /// Turns fully played. A game that ends during turn 3's scan reports 3.
    pub turns_played: u32,
    /// Shots sent, answered or not.
    pub shots_fired: u32,
    /// The server's `gameover` message.
    pub final_message: Fields,
}

/// What came back from a river during a scan.
enum RiverScan {
    Reports(Vec<TurnReport>),
    GameOver(Fields),
}

/// One reply read during a scan.
enum ScanReply {
    Report(TurnReport),
    GameOver(Fields),
}

/// Plays one game over four river channels.
///
/// The board lives on the stack of [`run`](Self::run) and is lent to each
/// phase. The channels are owned here and each is only ever used for one
/// request at a time.
pub struct Orchestrator<D: Datagram, C: Codec = JsonCodec> {
    channels: [RiverChannel<D>; RIVER_COUNT],
    codec: C,
    secret: String,
    phase: Phase,
    turn: u32,
    shots_fired: u32,
}

impl Orchestrator<UdpDatagram> {
    /// Resolves the server, opens one UDP socket per river, and returns an
    /// orchestrator speaking JSON.
    ///
    /// # Errors
    /// `ClientError::Config` for an unusable config, `ClientError::Transport`
    /// if a river can't be resolved or a socket can't be set up.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let config = config.validated()?;
        let channels = connect_rivers(&config.host, config.base_port, config.retry).await?;
        Self::new(channels, JsonCodec, config.secret)
    }
}

impl<D: Datagram, C: Codec> Orchestrator<D, C> {
    /// Creates an orchestrator over already-connected channels.
    ///
    /// # Errors
    /// `ClientError::Config` unless there is exactly one channel per river,
    /// in river order.
    pub fn new(
        channels: Vec<RiverChannel<D>>,
        codec: C,
        secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let channels: [RiverChannel<D>; RIVER_COUNT] =
            channels.try_into().map_err(|rest: Vec<RiverChannel<D>>| {
                ClientError::Config(format!(
                    "expected {RIVER_COUNT} river channels, got {}",
                    rest.len()
                ))
            })?;

        for (i, channel) in channels.iter().enumerate() {
            if channel.river().index() != i {
                return Err(ClientError::Config(format!(
                    "channel {i} is bound to {}",
                    channel.river()
                )));
            }
        }

        Ok(Self {
            channels,
            codec,
            secret: secret.into(),
            phase: Phase::Authenticating,
            turn: 0,
            shots_fired: 0,
        })
    }

    /// The phase the client is in.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The turn being played, starting at 0.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Plays until the server ends the game.
    ///
    /// # Errors
    /// Any failure while authenticating or fetching the inventory.
    pub async fn run(mut self) -> Result<GameOutcome, ClientError> {
        info!(phase = %self.phase, "starting");
        self.authenticate().await?;

        self.advance(Phase::FetchingInventory);
        let mut board = match self.fetch_inventory().await? {
            ControlFlow::Continue(board) => board,
            ControlFlow::Break(message) => return Ok(self.finish(message).await),
        };

        loop {
            self.advance(Phase::Scanning);
            if let ControlFlow::Break(message) = self.scan(&mut board).await {
                return Ok(self.finish(message).await);
            }
            debug!(turn = self.turn, "board after scan\n{board}");

            self.advance(Phase::Firing);
            if let ControlFlow::Break(message) = self.fire(&board).await {
                return Ok(self.finish(message).await);
            }

            board.clear_turn();
            self.turn += 1;
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "{} -> {next}",
            self.phase
        );
        if next != Phase::Scanning || self.phase != Phase::Firing {
            info!(from = %self.phase, to = %next, turn = self.turn, "phase change");
        } else {
            debug!(turn = self.turn, "next turn");
        }
        self.phase = next;
    }

    async fn authenticate(&mut self) -> Result<(), ClientError> {
        let message = Request::Authenticate.encode(&self.codec, &self.secret)?;
        for channel in &mut self.channels {
            let reply = channel.request(&message).await?;
            debug!(river = %channel.river(), bytes = reply.len(), "authenticated");
        }
        Ok(())
    }

    async fn fetch_inventory(&mut self) -> Result<ControlFlow<Fields, Board>, ClientError> {
        let message = Request::GetCannons.encode(&self.codec, &self.secret)?;
        let codec = &self.codec;
        let reply = self.channels[0]
            .request_matching(&message, |data| is_inventory_reply(codec, data))
            .await?;
        let fields = self.codec.decode(&reply)?;
        if fields.is_game_over()? {
            return Ok(ControlFlow::Break(fields));
        }

        let board = Board::from_inventory(&fields.inventory()?)?;
        info!(
            n_bridges = board.n_bridges(),
            cannons = board.active_count(),
            "inventory received"
        );
        Ok(ControlFlow::Continue(board))
    }

    /// Polls every river for this turn and files the sightings.
    async fn scan(&mut self, board: &mut Board) -> ControlFlow<Fields> {
        let getturn = Request::GetTurn { turn: self.turn };
        let request = match getturn.encode(&self.codec, &self.secret) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(turn = self.turn, error = %e, "could not build getturn");
                return ControlFlow::Continue(());
            }
        };

        let expected = board.n_bridges();
        for channel in &mut self.channels {
            let river = channel.river();
            let reports = match scan_river(channel, &self.codec, &request, expected).await {
                RiverScan::GameOver(message) => return ControlFlow::Break(message),
                RiverScan::Reports(reports) => reports,
            };

            for report in &reports {
                match board.record_sighting(river, report) {
                    Ok(ships) => debug!(%river, bridge = report.bridge, ships, "sighting"),
                    Err(e) => warn!(%river, error = %e, "sighting dropped"),
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Takes every pending shot, stopping early on `gameover`.
    async fn fire(&mut self, board: &Board) -> ControlFlow<Fields> {
        for shot in board.pending_shots() {
            if let Some(message) = self.fire_one(&shot).await {
                return ControlFlow::Break(message);
            }
        }
        ControlFlow::Continue(())
    }

    async fn fire_one(&mut self, shot: &Shot) -> Option<Fields> {
        let river = shot.target;
        let request = Request::Shot {
            bridge: shot.bridge(),
            row: shot.row as u32,
            ship: shot.ship.clone(),
        };
        let message = match request.encode(&self.codec, &self.secret) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%river, error = %e, "could not build shot");
                return None;
            }
        };

        self.shots_fired += 1;
        debug!(
            %river,
            row = shot.row,
            bridge = shot.bridge(),
            side = %shot.side,
            ship = %shot.ship,
            "firing"
        );

        let reply = match self.channels[river.index()].request(&message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%river, error = %e, "shot went unanswered");
                return None;
            }
        };

        let decoded = self.codec.decode(&reply);
        match decoded.and_then(|f| Ok((f.is_game_over()?, f))) {
            Ok((true, message)) => Some(message),
            Ok((false, message)) => {
                debug!(%river, reply = %message, "shot acknowledged");
                None
            }
            Err(e) => {
                warn!(%river, error = %e, "unreadable shot reply");
                None
            }
        }
    }

    async fn finish(mut self, message: Fields) -> GameOutcome {
        self.advance(Phase::GameOver);
        info!(turn = self.turn, shots = self.shots_fired, %message, "game over");

        self.advance(Phase::Quitting);
        match Request::Quit.encode(&self.codec, &self.secret) {
            Ok(bytes) => {
                if let Err(e) = self.channels[0].send(&bytes).await {
                    warn!(error = %e, "quit not sent");
                }
            }
            Err(e) => warn!(error = %e, "could not build quit"),
        }

        self.advance(Phase::Done);
        GameOutcome {
            turns_played: self.turn,
            shots_fired: self.shots_fired,
            final_message: message,
        }
    }
}

/// Sends `getturn` on one river and reads `expected` sightings.
///
/// Anything already queued on the channel is dropped before each send, so
/// a late reply to an earlier request can't take a sighting's place.
/// Replies that don't read as a sighting are logged and don't count.
///
/// A timeout mid-collection means replies were lost, so the request goes
/// out again and collection restarts from zero: the server answers every
/// `getturn` with a full set. After `max_retransmissions` resends the
/// river is given up on and whatever the last round collected is kept.
async fn scan_river<D: Datagram, C: Codec>(
    channel: &mut RiverChannel<D>,
    codec: &C,
    request: &[u8],
    expected: usize,
) -> RiverScan {
    let river = channel.river();
    let max_attempts = channel.policy().max_attempts();
    let mut reports = Vec::with_capacity(expected);

    'attempt: for attempt in 1..=max_attempts {
        channel.drain().await;
        if let Err(e) = channel.send(request).await {
            warn!(%river, error = %e, "getturn not sent, skipping river");
            return RiverScan::Reports(reports);
        }
        reports.clear();

        while reports.len() < expected {
            let data = match channel.recv_within().await {
                Ok(Some(data)) => data,
                Ok(None) => {
                    warn!(
                        %river,
                        attempt,
                        received = reports.len(),
                        expected,
                        "scan timed out, resending getturn"
                    );
                    continue 'attempt;
                }
                Err(e) => {
                    warn!(%river, error = %e, "scan failed, skipping river");
                    return RiverScan::Reports(reports);
                }
            };

            match read_scan_reply(codec, &data) {
                Ok(ScanReply::GameOver(message)) => return RiverScan::GameOver(message),
                Ok(ScanReply::Report(report)) => reports.push(report),
                Err(e) => warn!(%river, error = %e, "not a sighting, ignored"),
            }
        }
        return RiverScan::Reports(reports);
    }

    warn!(
        %river,
        attempts = max_attempts,
        kept = reports.len(),
        expected,
        "giving up on river for this turn"
    );
    RiverScan::Reports(reports)
}

/// A reply `getcannons` can use: the inventory itself, or `gameover`.
///
/// Anything else on river 0 is a late answer to an earlier request.
fn is_inventory_reply<C: Codec>(codec: &C, data: &[u8]) -> bool {
    codec.decode(data).is_ok_and(|fields| {
        fields.get(field::CANNONS).is_some() || fields.is_game_over().unwrap_or(false)
    })
}

fn read_scan_reply<C: Codec>(codec: &C, data: &[u8]) -> Result<ScanReply, ProtocolError> {
    let fields = codec.decode(data)?;
    if fields.is_game_over()? {
        return Ok(ScanReply::GameOver(fields));
    }
    Ok(ScanReply::Report(fields.turn_report()?))
}

#[cfg(test)]
mod tests {
    use bridgefire_protocol::RiverId;
    use bridgefire_transport::{MemoryDatagram, RetryPolicy};

    use super::*;

    fn channels(n: usize) -> (Vec<RiverChannel<MemoryDatagram>>, Vec<MemoryDatagram>) {
        (0..n)
            .map(|i| {
                let (client, server) = MemoryDatagram::pair();
                let river = RiverId::new(i % RIVER_COUNT).unwrap();
                (RiverChannel::new(river, client, RetryPolicy::default()), server)
            })
            .unzip()
    }

    #[test]
    fn test_new_requires_one_channel_per_river() {
        let (three, _peers) = channels(3);
        let err = Orchestrator::new(three, JsonCodec, "s").err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn test_new_requires_river_order() {
        let (mut four, _peers) = channels(4);
        four.swap(1, 2);
        let err = Orchestrator::new(four, JsonCodec, "s").err().unwrap();
        assert!(err.to_string().contains("channel 1"));
    }

    #[test]
    fn test_new_starts_authenticating_at_turn_zero() {
        let (four, _peers) = channels(4);
        let orchestrator = Orchestrator::new(four, JsonCodec, "s").unwrap();
        assert_eq!(orchestrator.phase(), Phase::Authenticating);
        assert_eq!(orchestrator.turn(), 0);
    }

    #[test]
    fn test_read_scan_reply() {
        let state = br#"{"type": "state", "bridge": 1, "ships": [{"id": 7}]}"#;
        let report = read_scan_reply(&JsonCodec, state).unwrap();
        assert!(matches!(report, ScanReply::Report(TurnReport { bridge: 1, .. })));

        let over = read_scan_reply(&JsonCodec, br#"{"type": "gameover"}"#).unwrap();
        assert!(matches!(over, ScanReply::GameOver(_)));

        assert!(read_scan_reply(&JsonCodec, br#"{"bridge": 1}"#).is_err());
    }

    #[test]
    fn test_inventory_reply_filter() {
        let inventory = br#"{"type": "cannons", "cannons": [[1, 2]]}"#;
        assert!(is_inventory_reply(&JsonCodec, inventory));
        assert!(is_inventory_reply(&JsonCodec, br#"{"type": "gameover"}"#));

        assert!(!is_inventory_reply(&JsonCodec, br#"{"type": "authresp"}"#));
        assert!(!is_inventory_reply(&JsonCodec, b"garbage"));
    }
}
