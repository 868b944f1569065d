//! The game session orchestrator.
//!
//! A session is one Tokio task owning all mutable state — the board, the
//! interaction controller, the reconciler, the chat log — plus one DM link.
//! Everything reaches it through a command channel, and the task's
//! `select!` loop interleaves three event sources:
//!
//! 1. commands from [`SessionHandle`]s (UI input, queries, shutdown)
//! 2. inbound frames from the DM link
//! 3. the periodic full-state push timer
//!
//! Because a single task serializes all of them, every mutation is atomic
//! within one event-loop turn, and a local move racing a DM move resolves
//! by arrival order — last write wins.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use gridlink_board::{BoardStore, MapCatalog, Token};
use gridlink_dice::{DiceRollResult, DiceSpec};
use gridlink_input::{GridGeometry, InteractionController, PendingAction, PointerCapture};
use gridlink_protocol::{
    ClientMessage, Codec, DiceRollPayload, DmMessage, GameStateSnapshot, JsonCodec, PlayerAction,
};
use gridlink_transport::{DmLink, SessionId, TransportError, WsLink};

use crate::chat::{ChatLog, ChatMessage};
use crate::config::SessionConfig;
use crate::error::GridlinkError;
use crate::hooks::{NoopRewards, RewardIssuer, SilentSounds, SoundTrigger};
use crate::push::PushTimer;
use crate::reconciler::{LinkState, Reconciler};

/// Command channel size for the session actor.
const COMMAND_CHANNEL_SIZE: usize = 64;

/// Commands sent to the session actor through its channel.
enum SessionCommand {
    ClickCell {
        x: u32,
        y: u32,
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    DoubleClick {
        x: u32,
        y: u32,
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    TogglePlacing {
        reply: oneshot::Sender<Result<bool, GridlinkError>>,
    },
    PlaceRandom {
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    // Pointer traffic is fire-and-forget: it arrives per frame during a
    // drag, and the UI queries state when it cares.
    PointerDown { px: i32, py: i32 },
    PointerMove { px: i32, py: i32 },
    PointerUp,
    RollDice {
        spec: Option<String>,
        reply: oneshot::Sender<Result<DiceRollResult, GridlinkError>>,
    },
    UserInput {
        content: String,
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    UserInputWithRoll {
        content: String,
        spec: String,
        reply: oneshot::Sender<Result<DiceRollResult, GridlinkError>>,
    },
    EnableAiControl {
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    SelectMap {
        map_id: String,
        reply: oneshot::Sender<Result<(), GridlinkError>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameStateSnapshot>,
    },
    Chat {
        reply: oneshot::Sender<Vec<ChatMessage>>,
    },
    Tokens {
        reply: oneshot::Sender<Vec<Token>>,
    },
    LinkState {
        reply: oneshot::Sender<LinkState>,
    },
    Narration {
        reply: oneshot::Sender<Option<String>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and starts a game session.
///
/// # Example
///
/// ```rust,no_run
/// use gridlink::GameSessionBuilder;
///
/// # async fn run() -> Result<(), gridlink::GridlinkError> {
/// let session = GameSessionBuilder::new()
///     .map("default")
///     .connect("127.0.0.1:8000")
///     .await?;
/// session.toggle_placing().await?;
/// session.click_cell(2, 2).await?;
/// # Ok(())
/// # }
/// ```
pub struct GameSessionBuilder<R: RewardIssuer = NoopRewards, S: SoundTrigger = SilentSounds> {
    config: SessionConfig,
    catalog: MapCatalog,
    map_id: String,
    rewards: R,
    sounds: S,
    capture: Option<Box<dyn PointerCapture>>,
}

impl GameSessionBuilder {
    /// A builder with defaults: built-in maps, the `default` map, no-op
    /// reward and sound hooks.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            catalog: MapCatalog::builtin(),
            map_id: "default".to_string(),
            rewards: NoopRewards,
            sounds: SilentSounds,
            capture: None,
        }
    }
}

impl Default for GameSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RewardIssuer, S: SoundTrigger> GameSessionBuilder<R, S> {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: MapCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Selects the starting map by catalog id.
    pub fn map(mut self, map_id: &str) -> Self {
        self.map_id = map_id.to_string();
        self
    }

    /// Wires the reward issuer invoked on narrative milestones.
    pub fn rewards<R2: RewardIssuer>(self, rewards: R2) -> GameSessionBuilder<R2, S> {
        GameSessionBuilder {
            config: self.config,
            catalog: self.catalog,
            map_id: self.map_id,
            rewards,
            sounds: self.sounds,
            capture: self.capture,
        }
    }

    /// Wires the sound trigger invoked on token landings and dice rolls.
    pub fn sounds<S2: SoundTrigger>(self, sounds: S2) -> GameSessionBuilder<R, S2> {
        GameSessionBuilder {
            config: self.config,
            catalog: self.catalog,
            map_id: self.map_id,
            rewards: self.rewards,
            sounds,
            capture: self.capture,
        }
    }

    /// Wires the pointer-capture scope the UI holds during drags.
    pub fn capture(mut self, capture: Box<dyn PointerCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Generates a session id, dials the DM service, and spawns the session.
    pub async fn connect(self, host: &str) -> Result<SessionHandle, GridlinkError> {
        let session_id = SessionId::generate();
        let link = WsLink::connect(host, session_id.clone()).await?;
        let mut handle = self.spawn_with_link(link)?;
        handle.session_id = Some(session_id);
        Ok(handle)
    }

    /// Spawns the session over an already-established link. This is how
    /// tests (and alternative transports) drive a session.
    pub fn spawn_with_link<L: DmLink>(self, link: L) -> Result<SessionHandle, GridlinkError> {
        let config = self.config.validated();
        let map = self
            .catalog
            .get(&self.map_id)
            .cloned()
            .ok_or_else(|| GridlinkError::UnknownMap(self.map_id.clone()))?;

        let store = BoardStore::new(map.clone(), config.token_cap, &mut rand::rng());
        let geometry = GridGeometry::for_map(&map);
        let controller = match self.capture {
            Some(capture) => InteractionController::with_capture(geometry, capture),
            None => InteractionController::new(geometry),
        };

        let mut reconciler = Reconciler::new();
        reconciler.on_open();

        let mut push = PushTimer::new(config.push_interval);
        push.arm();

        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        let actor = SessionActor {
            config,
            catalog: self.catalog,
            store,
            controller,
            reconciler,
            chat: ChatLog::new(),
            codec: JsonCodec,
            link: Some(link),
            push,
            ai_mode: false,
            in_combat: false,
            last_action: None,
            rewards: Arc::new(self.rewards),
            sounds: self.sounds,
            rx,
        };

        tokio::spawn(actor.run());

        Ok(SessionHandle {
            tx,
            session_id: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running session. Cheap to clone; all methods go through the
/// actor's command channel, so callers never touch session state directly.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
    session_id: Option<SessionId>,
}

impl SessionHandle {
    /// The session id scoping the DM connection, when this session dialed
    /// out itself (absent for sessions spawned over a custom link).
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, GridlinkError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| GridlinkError::Closed)?;
        reply_rx.await.map_err(|_| GridlinkError::Closed)
    }

    /// Click on cell `(x, y)` — select, move, or place depending on mode.
    /// Validation rejections come back as [`GridlinkError::Board`].
    pub async fn click_cell(&self, x: u32, y: u32) -> Result<(), GridlinkError> {
        self.request(|reply| SessionCommand::ClickCell { x, y, reply })
            .await?
    }

    /// Double-click on cell `(x, y)` — deletes the token there.
    pub async fn double_click(&self, x: u32, y: u32) -> Result<(), GridlinkError> {
        self.request(|reply| SessionCommand::DoubleClick { x, y, reply })
            .await?
    }

    /// Enters/leaves placing mode. Returns whether placing is now active.
    pub async fn toggle_placing(&self) -> Result<bool, GridlinkError> {
        self.request(|reply| SessionCommand::TogglePlacing { reply })
            .await?
    }

    /// Places a token on a random free cell, if the board has one.
    pub async fn place_random_token(&self) -> Result<(), GridlinkError> {
        self.request(|reply| SessionCommand::PlaceRandom { reply })
            .await?
    }

    /// Pointer pressed at pixel `(px, py)` relative to the grid origin.
    pub async fn pointer_down(&self, px: i32, py: i32) -> Result<(), GridlinkError> {
        self.tx
            .send(SessionCommand::PointerDown { px, py })
            .await
            .map_err(|_| GridlinkError::Closed)
    }

    /// Pointer moved. Valid whether or not the pointer is over the grid.
    pub async fn pointer_move(&self, px: i32, py: i32) -> Result<(), GridlinkError> {
        self.tx
            .send(SessionCommand::PointerMove { px, py })
            .await
            .map_err(|_| GridlinkError::Closed)
    }

    /// Pointer released — commits an in-flight drag.
    pub async fn pointer_up(&self) -> Result<(), GridlinkError> {
        self.tx
            .send(SessionCommand::PointerUp)
            .await
            .map_err(|_| GridlinkError::Closed)
    }

    /// Rolls the awaited die (or `spec`, if given) and reports it to the DM.
    /// Fails with [`GridlinkError::NotAwaitingRoll`] when no roll is due.
    pub async fn roll_dice(&self, spec: Option<String>) -> Result<DiceRollResult, GridlinkError> {
        self.request(|reply| SessionCommand::RollDice { spec, reply })
            .await?
    }

    /// Sends free-text input to the DM and logs it to chat.
    pub async fn user_input(&self, content: impl Into<String>) -> Result<(), GridlinkError> {
        let content = content.into();
        self.request(|reply| SessionCommand::UserInput { content, reply })
            .await?
    }

    /// Sends free-text input with a dice roll attached — "I strike at the
    /// troll" plus the d20 that decides it. The roll happens here, rides
    /// along in the `user_input` envelope, and is returned to the caller.
    pub async fn user_input_with_roll(
        &self,
        content: impl Into<String>,
        spec: &str,
    ) -> Result<DiceRollResult, GridlinkError> {
        let content = content.into();
        let spec = spec.to_string();
        self.request(|reply| SessionCommand::UserInputWithRoll { content, spec, reply })
            .await?
    }

    /// Hands narrative control to the DM. Requires at least one token.
    pub async fn enable_ai_control(&self) -> Result<(), GridlinkError> {
        self.request(|reply| SessionCommand::EnableAiControl { reply })
            .await?
    }

    /// Discards the board and rebuilds it on the named map.
    pub async fn select_map(&self, map_id: &str) -> Result<(), GridlinkError> {
        let map_id = map_id.to_string();
        self.request(|reply| SessionCommand::SelectMap { map_id, reply })
            .await?
    }

    /// Captures the current full-state snapshot (the `get_state` payload).
    pub async fn snapshot(&self) -> Result<GameStateSnapshot, GridlinkError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// The chat log so far.
    pub async fn chat(&self) -> Result<Vec<ChatMessage>, GridlinkError> {
        self.request(|reply| SessionCommand::Chat { reply }).await
    }

    /// The tokens currently on the board.
    pub async fn tokens(&self) -> Result<Vec<Token>, GridlinkError> {
        self.request(|reply| SessionCommand::Tokens { reply }).await
    }

    /// Current reconciler link state.
    pub async fn link_state(&self) -> Result<LinkState, GridlinkError> {
        self.request(|reply| SessionCommand::LinkState { reply }).await
    }

    /// Latest ambient narration text, if any has arrived.
    pub async fn narration(&self) -> Result<Option<String>, GridlinkError> {
        self.request(|reply| SessionCommand::Narration { reply }).await
    }

    /// Tears the session down: cancels the push timer, resolves any
    /// in-flight drag, and closes the link.
    pub async fn shutdown(&self) -> Result<(), GridlinkError> {
        self.request(|reply| SessionCommand::Shutdown { reply }).await
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The session actor. Runs inside a Tokio task until shutdown.
struct SessionActor<L: DmLink, R: RewardIssuer, S: SoundTrigger> {
    config: SessionConfig,
    catalog: MapCatalog,
    store: BoardStore,
    controller: InteractionController,
    reconciler: Reconciler,
    chat: ChatLog,
    codec: JsonCodec,
    link: Option<L>,
    push: PushTimer,
    ai_mode: bool,
    in_combat: bool,
    last_action: Option<PlayerAction>,
    rewards: Arc<R>,
    sounds: S,
    rx: mpsc::Receiver<SessionCommand>,
}

impl<L: DmLink, R: RewardIssuer, S: SoundTrigger> SessionActor<L, R, S> {
    async fn run(mut self) {
        tracing::info!(map = %self.store.map().id, "session started");

        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).await {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("all session handles dropped");
                        break;
                    }
                },
                inbound = Self::recv_or_pending(&mut self.link) => {
                    self.handle_inbound(inbound);
                }
                _ = self.push.wait() => {
                    self.push_state().await;
                }
            }
        }

        self.teardown().await;
    }

    /// Receives from the link, or pends forever once it's gone so the
    /// `select!` keeps serving commands.
    async fn recv_or_pending(link: &mut Option<L>) -> Result<Option<Vec<u8>>, TransportError> {
        match link {
            Some(link) => link.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Handles one command. Returns `true` when the session should stop.
    async fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::ClickCell { x, y, reply } => {
                let result = self.handle_click(x, y).await;
                let _ = reply.send(result);
            }
            SessionCommand::DoubleClick { x, y, reply } => {
                if let Some(action) = self.controller.double_click(&mut self.store, x, y) {
                    self.report_action(action).await;
                }
                let _ = reply.send(Ok(()));
            }
            SessionCommand::TogglePlacing { reply } => {
                let placing = self.controller.toggle_placing(&mut self.store);
                let _ = reply.send(Ok(placing));
            }
            SessionCommand::PlaceRandom { reply } => {
                let result = self.handle_place_random().await;
                let _ = reply.send(result);
            }
            SessionCommand::PointerDown { px, py } => {
                self.controller.pointer_down(&mut self.store, px, py);
            }
            SessionCommand::PointerMove { px, py } => {
                self.controller.pointer_move(&mut self.store, px, py);
            }
            SessionCommand::PointerUp => {
                if let Some(action) = self.controller.pointer_up(&mut self.store) {
                    self.report_action(action).await;
                }
            }
            SessionCommand::RollDice { spec, reply } => {
                let result = self.handle_roll(spec).await;
                let _ = reply.send(result);
            }
            SessionCommand::UserInput { content, reply } => {
                self.chat.push_user(content.clone());
                self.send(&ClientMessage::UserInput {
                    content,
                    dice_roll: None,
                })
                .await;
                let _ = reply.send(Ok(()));
            }
            SessionCommand::UserInputWithRoll { content, spec, reply } => {
                let result = self.handle_user_input_with_roll(content, &spec).await;
                let _ = reply.send(result);
            }
            SessionCommand::EnableAiControl { reply } => {
                let result = self.handle_ai_control().await;
                let _ = reply.send(result);
            }
            SessionCommand::SelectMap { map_id, reply } => {
                let _ = reply.send(self.handle_select_map(&map_id));
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.capture_snapshot());
            }
            SessionCommand::Chat { reply } => {
                let _ = reply.send(self.chat.messages().to_vec());
            }
            SessionCommand::Tokens { reply } => {
                let _ = reply.send(self.store.tokens().to_vec());
            }
            SessionCommand::LinkState { reply } => {
                let _ = reply.send(self.reconciler.state());
            }
            SessionCommand::Narration { reply } => {
                let _ = reply.send(self.reconciler.narration().map(str::to_string));
            }
            SessionCommand::Shutdown { reply } => {
                let _ = reply.send(());
                return true;
            }
        }
        false
    }

    async fn handle_click(&mut self, x: u32, y: u32) -> Result<(), GridlinkError> {
        match self.controller.click_cell(&mut self.store, x, y) {
            Ok(Some(action)) => {
                self.report_action(action).await;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::warn!(x, y, error = %e, "click rejected");
                Err(e.into())
            }
        }
    }

    async fn handle_place_random(&mut self) -> Result<(), GridlinkError> {
        let Some((x, y)) = self.store.random_free_cell(&mut rand::rng()) else {
            tracing::debug!("no free cell for a random token");
            return Ok(());
        };
        let token = self.store.place_token(x, y)?;
        self.report_action(PendingAction::Add {
            token: token.id,
            x,
            y,
        })
        .await;
        Ok(())
    }

    async fn handle_roll(&mut self, spec: Option<String>) -> Result<DiceRollResult, GridlinkError> {
        if self.reconciler.state() != LinkState::AwaitingDiceRoll {
            return Err(GridlinkError::NotAwaitingRoll);
        }
        let spec_str = spec
            .or_else(|| self.reconciler.pending_dice().map(str::to_string))
            .unwrap_or_else(|| self.config.default_dice.clone());
        let dice: DiceSpec = spec_str.parse()?;
        let result = dice.roll_with(&mut rand::rng());

        self.chat.push_user(roll_chat_line(&result));
        self.sounds.play_dice_sound(&dice.to_string());
        self.send(&ClientMessage::RollDice {
            dice_type: dice.to_string(),
            result: result.total,
            individual_rolls: result.rolls.clone(),
        })
        .await;
        self.reconciler.roll_resolved();
        Ok(result)
    }

    async fn handle_user_input_with_roll(
        &mut self,
        content: String,
        spec: &str,
    ) -> Result<DiceRollResult, GridlinkError> {
        let dice: DiceSpec = spec.parse()?;
        let result = dice.roll_with(&mut rand::rng());

        self.chat.push_user(content.clone());
        self.chat.push_user(roll_chat_line(&result));
        self.sounds.play_dice_sound(&dice.to_string());
        self.send(&ClientMessage::UserInput {
            content,
            dice_roll: Some(DiceRollPayload {
                dice_type: dice.to_string(),
                result: result.total,
            }),
        })
        .await;
        Ok(result)
    }

    async fn handle_ai_control(&mut self) -> Result<(), GridlinkError> {
        if self.store.tokens().is_empty() {
            return Err(GridlinkError::NoTokens);
        }
        self.ai_mode = true;
        self.send(&ClientMessage::AiControl { enabled: true }).await;

        // Adventure start is a narrative milestone; the reward outcome is
        // logged and never interpreted. Spawned so a slow backend can't
        // stall the session loop.
        let rewards = Arc::clone(&self.rewards);
        tokio::spawn(async move {
            match rewards.issue_reward("adventure-started").await {
                Ok(hash) if !hash.is_empty() => {
                    tracing::info!(%hash, "milestone reward issued");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "reward issuance failed"),
            }
        });
        Ok(())
    }

    fn handle_select_map(&mut self, map_id: &str) -> Result<(), GridlinkError> {
        let map = self
            .catalog
            .get(map_id)
            .cloned()
            .ok_or_else(|| GridlinkError::UnknownMap(map_id.to_string()))?;

        self.controller.abort(&mut self.store);
        self.store = BoardStore::new(map.clone(), self.config.token_cap, &mut rand::rng());
        self.controller
            .set_geometry(&mut self.store, GridGeometry::for_map(&map));
        self.last_action = None;
        tracing::info!(map = %map.id, "board rebuilt on new map");
        Ok(())
    }

    fn handle_inbound(&mut self, inbound: Result<Option<Vec<u8>>, TransportError>) {
        match inbound {
            Ok(Some(data)) => {
                let msg: DmMessage = match self.codec.decode(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        // ProtocolError path: drop the directive, keep the
                        // link and every later message.
                        tracing::warn!(error = %e, "dropping malformed DM message");
                        return;
                    }
                };
                self.reconciler.apply(
                    msg,
                    &mut self.store,
                    &mut self.chat,
                    self.ai_mode,
                    &self.config.default_dice,
                    &self.sounds,
                );
            }
            Ok(None) => {
                tracing::info!("DM closed the link");
                self.drop_link();
            }
            Err(e) => {
                tracing::warn!(error = %e, "DM link error");
                self.drop_link();
            }
        }
    }

    /// Reports a local interaction to the DM and fires local side effects
    /// (terrain sound, fog reveal) for landings.
    async fn report_action(&mut self, action: PendingAction) {
        let wire = match action {
            PendingAction::Add { token, x, y } => {
                self.on_landing(x, y);
                PlayerAction::add(token, "player", x, y)
            }
            PendingAction::Move { token, from, to } => {
                self.on_landing(to.0, to.1);
                PlayerAction::moved(token, from, to)
            }
            PendingAction::Select { token } => PlayerAction::select(token),
            PendingAction::Remove { token } => PlayerAction::remove(token),
        };
        self.last_action = Some(wire.clone());
        self.send(&ClientMessage::PlayerAction { action: wire }).await;
    }

    fn on_landing(&mut self, x: u32, y: u32) {
        if let Some(terrain) = self.store.terrain_at(x, y) {
            self.sounds.play_terrain_sound(terrain);
        }
        self.store.reveal_around(x, y, self.config.vision_range);
    }

    fn capture_snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot::capture(&self.store, self.last_action.clone(), self.in_combat)
    }

    async fn push_state(&mut self) {
        let snapshot = self.capture_snapshot();
        self.send(&ClientMessage::GetState(snapshot)).await;
    }

    /// Best-effort outbound send: with the link down the message is
    /// dropped silently, and a failing send takes the link down.
    async fn send(&mut self, msg: &ClientMessage) {
        if self.link.is_none() {
            tracing::debug!("link down — dropping outbound message");
            return;
        }
        let bytes = match self.codec.encode(msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outbound message");
                return;
            }
        };

        let mut failed = false;
        if let Some(link) = self.link.as_mut() {
            if let Err(e) = link.send(&bytes).await {
                tracing::warn!(error = %e, "send failed — dropping link");
                failed = true;
            }
        }
        if failed {
            self.drop_link();
        }
    }

    fn drop_link(&mut self) {
        self.link = None;
        self.reconciler.on_close();
        self.push.disarm();
    }

    async fn teardown(&mut self) {
        self.push.disarm();
        self.controller.abort(&mut self.store);
        self.reconciler.on_close();
        if let Some(mut link) = self.link.take() {
            let _ = link.close().await;
        }
        tracing::info!("session torn down");
    }
}

fn roll_chat_line(result: &DiceRollResult) -> String {
    if result.rolls.len() == 1 {
        format!("Rolled {}: {}", result.spec, result.total)
    } else {
        let parts: Vec<String> = result.rolls.iter().map(u32::to_string).collect();
        format!("Rolled {}: {} ({})", result.spec, result.total, parts.join(" + "))
    }
}
