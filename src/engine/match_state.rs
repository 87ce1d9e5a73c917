//! Движок правил: одно живое состояние фрейма + накопленные итоги матча.
//!
//! Все мутации идут через `MatchState::apply`, который сначала проверяет
//! парный предикат `can_*` (см. `validation.rs`), и только потом меняет поля.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    Ball, BallValue, BreakOff, MatchOptions, OptionsError, Player, PlayerId, RedsMode,
    Timestamp, COLOR_VALUES, NUM_COLORS, RED_VALUE,
};
use crate::engine::actions::MatchAction;
use crate::engine::errors::EngineError;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::time_ctrl::FrameClock;

/// Текущая версия формата снапшота.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Фаза матча (производная от флагов).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchPhase {
    InProgress,
    FrameOver,
    /// Терминальное состояние: выхода нет.
    MatchOver,
}

/// Состояние матча в одной точке истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchState {
    format_version: u32,

    // матч
    max_frames: u32,
    max_balls: u32,
    break_off_pid: PlayerId,
    frames_played: u32,
    match_over: bool,
    /// Момент создания матча (у первого снапшота) или начала фрейма.
    timestamp: Timestamp,

    // фрейм
    clock: FrameClock,
    num_balls: u32,
    cur_pid: PlayerId,
    red: bool,
    foul: bool,
    respot_black: bool,
    frame_over: bool,

    /// Ровно два игрока, `players[i].pid() == i`.
    players: Vec<Player>,
}

impl MatchState {
    /// Новый матч по настройкам. Разбивающий при `BreakOff::Random` определяется жребием.
    pub fn new<R: RandomSource>(
        options: &MatchOptions,
        rng: &mut R,
        now: Timestamp,
    ) -> Result<Self, OptionsError> {
        options.validate()?;

        let break_off_pid = match options.break_off {
            BreakOff::Player(pid) => pid,
            BreakOff::Random => {
                if rng.coin_flip() {
                    0
                } else {
                    1
                }
            }
        };

        let players = options
            .names
            .iter()
            .enumerate()
            .map(|(pid, name)| Player::new(pid as PlayerId, name.clone()))
            .collect();

        let max_balls = options.reds.max_balls();

        Ok(Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            max_frames: options.max_frames,
            max_balls,
            break_off_pid,
            frames_played: 0,
            match_over: false,
            timestamp: now,
            clock: FrameClock::new(),
            num_balls: max_balls,
            cur_pid: break_off_pid,
            red: false,
            foul: false,
            respot_black: false,
            frame_over: false,
            players,
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Доступ к полям
    // ─────────────────────────────────────────────────────────────

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn max_balls(&self) -> u32 {
        self.max_balls
    }

    pub fn frames_played(&self) -> u32 {
        self.frames_played
    }

    pub fn num_balls_on_table(&self) -> u32 {
        self.num_balls
    }

    pub fn current_player_id(&self) -> PlayerId {
        self.cur_pid
    }

    pub fn break_off_player_id(&self) -> PlayerId {
        self.break_off_pid
    }

    pub fn red_just_potted(&self) -> bool {
        self.red
    }

    pub fn foul(&self) -> bool {
        self.foul
    }

    pub fn respot_black(&self) -> bool {
        self.respot_black
    }

    pub fn is_frame_over(&self) -> bool {
        self.frame_over
    }

    pub fn is_match_over(&self) -> bool {
        self.match_over
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn phase(&self) -> MatchPhase {
        if self.match_over {
            MatchPhase::MatchOver
        } else if self.frame_over {
            MatchPhase::FrameOver
        } else {
            MatchPhase::InProgress
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, pid: PlayerId) -> Result<&Player, EngineError> {
        self.players
            .iter()
            .find(|p| p.pid() == pid)
            .ok_or(EngineError::PlayerNotFound(pid))
    }

    fn player_mut(&mut self, pid: PlayerId) -> Result<&mut Player, EngineError> {
        self.players
            .iter_mut()
            .find(|p| p.pid() == pid)
            .ok_or(EngineError::PlayerNotFound(pid))
    }

    fn other_pid(&self) -> PlayerId {
        1 - self.cur_pid
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.cur_pid as usize]
    }

    pub fn other_player(&self) -> &Player {
        &self.players[self.other_pid() as usize]
    }

    /// Ход этого игрока? После конца фрейма — ничей.
    pub fn is_current_player(&self, pid: PlayerId) -> bool {
        !self.frame_over && pid == self.cur_pid
    }

    // ─────────────────────────────────────────────────────────────
    //  Шары и очки на столе
    // ─────────────────────────────────────────────────────────────

    pub fn num_reds(&self) -> u32 {
        self.num_balls.saturating_sub(NUM_COLORS)
    }

    pub fn num_colors_remaining(&self) -> u32 {
        self.num_balls.min(NUM_COLORS)
    }

    /// Счётчик для кнопки шара: 0 — все шары, 1 — красные, 2..=7 — есть ли этот цвет.
    pub fn num_balls(&self, value: BallValue) -> u32 {
        match value {
            0 => self.num_balls,
            RED_VALUE => self.num_reds(),
            _ => match Ball::from_value(value) {
                Some(ball) if self.num_colors_remaining() >= ball.clearing_rank() => 1,
                _ => 0,
            },
        }
    }

    /// Максимум очков, которые ещё можно набрать на столе.
    ///
    /// Каждый красный идёт с чёрным (8), плюс оставшиеся цвета —
    /// всегда хвост списка `COLOR_VALUES`, заканчивающийся чёрным.
    pub fn points_remaining_on_table(&self) -> u32 {
        let colors = self.num_colors_remaining() as usize;
        if colors == 0 {
            return 0;
        }

        let reds_and_blacks = self.num_reds() * (RED_VALUE + Ball::Black.value());
        let colors_sum: u32 = COLOR_VALUES[COLOR_VALUES.len() - colors..].iter().sum();

        reds_and_blacks + colors_sum
    }

    // ─────────────────────────────────────────────────────────────
    //  Предикаты действий
    // ─────────────────────────────────────────────────────────────

    pub fn can_pot_ball(&self, value: BallValue) -> bool {
        if self.frame_over {
            return false;
        }

        match Ball::from_value(value) {
            Some(ball) if ball.is_red() => self.num_reds() > 0,
            Some(ball) => self.can_pot_color(ball),
            None => false,
        }
    }

    fn can_pot_color(&self, ball: Ball) -> bool {
        if self.red {
            return true;
        }
        if self.num_reds() > 0 {
            return false;
        }
        // Цвета после красных — строго по порядку.
        self.num_colors_remaining() == ball.clearing_rank()
    }

    pub fn can_commit_foul(&self, value: BallValue) -> bool {
        if self.frame_over {
            return false;
        }

        match Ball::from_value(value) {
            Some(ball) => self.num_colors_remaining() >= ball.clearing_rank(),
            None => false,
        }
    }

    pub fn can_end_turn(&self) -> bool {
        !self.frame_over
    }

    /// Фрейм можно признать только при разнице в очках.
    pub fn can_end_frame(&self) -> bool {
        if self.frame_over {
            return false;
        }
        self.current_player().points != self.other_player().points
    }

    pub fn can_new_frame(&self) -> bool {
        self.frame_over && !self.match_over
    }

    pub fn can_adjust_balls(&self, delta: i32) -> bool {
        if self.frame_over {
            return false;
        }
        match delta {
            1 => self.num_balls < self.max_balls,
            -1 => self.num_balls > 0,
            _ => false,
        }
    }

    pub fn can_edit_points(&self, pid: PlayerId, delta: i64) -> bool {
        if self.frame_over {
            return false;
        }
        match self.player(pid) {
            Ok(p) => p.points_after(delta).is_some(),
            Err(_) => false,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Действия
    // ─────────────────────────────────────────────────────────────

    /// Единая точка входа для всех мутаций.
    pub fn apply(&mut self, action: &MatchAction, now: Timestamp) -> Result<(), EngineError> {
        validate_action(self, action)?;

        debug!(?action, pid = self.cur_pid, balls = self.num_balls, "apply");

        if action.is_shot() {
            self.log_shot(now);
        }

        match *action {
            MatchAction::PotBall(value) => self.apply_pot_ball(value, now),
            MatchAction::CommitFoul(value) => self.apply_commit_foul(value, now),
            MatchAction::EndTurn => self.switch_turn(now),
            MatchAction::EndFrame => self.finish_frame(now),
            MatchAction::NewFrame => {
                self.start_next_frame(now);
                Ok(())
            }
            MatchAction::AdjustBalls(delta) => {
                if delta > 0 {
                    self.num_balls += 1;
                } else {
                    self.num_balls -= 1;
                }
                Ok(())
            }
            MatchAction::EditPoints { pid, delta } => {
                let player = self.player_mut(pid)?;
                player.points = player
                    .points_after(delta)
                    .ok_or_else(|| EngineError::IllegalAction(action.clone()))?;
                Ok(())
            }
        }
    }

    pub fn pot_ball(&mut self, value: BallValue, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::PotBall(value), now)
    }

    pub fn commit_foul(&mut self, value: BallValue, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::CommitFoul(value), now)
    }

    pub fn end_turn(&mut self, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::EndTurn, now)
    }

    pub fn end_frame(&mut self, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::EndFrame, now)
    }

    pub fn new_frame(&mut self, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::NewFrame, now)
    }

    pub fn adjust_balls(&mut self, delta: i32, now: Timestamp) -> Result<(), EngineError> {
        self.apply(&MatchAction::AdjustBalls(delta), now)
    }

    pub fn edit_points(
        &mut self,
        pid: PlayerId,
        delta: i64,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.apply(&MatchAction::EditPoints { pid, delta }, now)
    }

    fn apply_pot_ball(&mut self, value: BallValue, now: Timestamp) -> Result<(), EngineError> {
        if matches!(Ball::from_value(value), Some(ball) if ball.is_red()) {
            self.num_balls -= 1;
            self.red = true;
        } else {
            // Пока на столе есть красные (или только что забит красный), цвет ставится обратно.
            if self.num_reds() == 0 && !self.red {
                self.num_balls -= 1;
            }
            self.red = false;
        }

        self.foul = false;
        let cur = self.cur_pid as usize;
        self.players[cur].pot(value, now);

        if self.points_remaining_on_table() == 0 {
            self.switch_turn(now)?;
        }
        Ok(())
    }

    fn apply_commit_foul(&mut self, value: BallValue, now: Timestamp) -> Result<(), EngineError> {
        let cur = self.cur_pid as usize;
        let other = self.other_pid() as usize;
        self.players[cur].log_foul(value);
        self.players[other].points = self.players[other].points.saturating_add(value);

        // Фол на последнем чёрном: убираем шар, чтобы проверка конца фрейма сработала.
        if self.num_colors_remaining() == 1 {
            self.num_balls -= 1;
        }

        self.switch_turn(now)?;

        // Флаг видит уже входящий игрок.
        self.foul = true;
        Ok(())
    }

    fn log_shot(&mut self, now: Timestamp) {
        let duration = self.clock.log_shot(now);
        let cur = self.cur_pid as usize;
        self.players[cur].log_shot(duration);
    }

    /// Смена хода: закрыть брейк, сбросить флаги, передать ход,
    /// затем проверить конец фрейма или переустановить чёрный.
    fn switch_turn(&mut self, now: Timestamp) -> Result<(), EngineError> {
        let cur = self.cur_pid as usize;
        self.players[cur].end_turn();

        self.red = false;
        self.foul = false;
        self.respot_black = false;

        self.cur_pid = self.other_pid();

        if self.detect_frame_over() {
            self.finish_frame(now)?;
        } else if self.num_colors_remaining() == 0 {
            self.num_balls += 1;
            self.respot_black = true;
            debug!(pid = self.cur_pid, "black respotted");
        }
        Ok(())
    }

    /// Отстающему уже не догнать лидера, даже забрав всё со стола.
    /// Пока на столе больше одного цвета, возможны снукеры — фрейм не закрываем.
    fn detect_frame_over(&self) -> bool {
        if self.num_colors_remaining() > 1 {
            return false;
        }

        let (leader, trailer) = self.leader_and_trailer();
        trailer.points.saturating_add(self.points_remaining_on_table()) < leader.points
    }

    fn leader_and_trailer(&self) -> (&Player, &Player) {
        let (a, b) = (&self.players[0], &self.players[1]);
        if a.compare(b) == Ordering::Less {
            (b, a)
        } else {
            (a, b)
        }
    }

    fn finish_frame(&mut self, now: Timestamp) -> Result<(), EngineError> {
        let winner = match self.players[0].compare(&self.players[1]) {
            Ordering::Greater => 0,
            Ordering::Less => 1,
            Ordering::Equal => return Err(EngineError::Internal("frame over with tied points")),
        };

        self.clock.stop(now);
        self.frame_over = true;
        self.frames_played += 1;
        self.players[winner].frame_wins += 1;

        info!(
            winner,
            frames_played = self.frames_played,
            points = ?[self.players[0].points, self.players[1].points],
            "frame over"
        );

        if self.max_frames > 0 && self.players[winner].frame_wins * 2 >= self.max_frames + 1 {
            self.match_over = true;
            info!(winner, frame_wins = self.players[winner].frame_wins, "match over");
        }
        Ok(())
    }

    fn start_next_frame(&mut self, now: Timestamp) {
        self.timestamp = now;
        self.clock.reset();
        self.num_balls = self.max_balls;

        self.red = false;
        self.foul = false;
        self.respot_black = false;
        self.frame_over = false;

        for p in self.players.iter_mut() {
            p.new_frame();
        }

        self.break_off_pid = 1 - self.break_off_pid;
        self.cur_pid = self.break_off_pid;

        debug!(break_off = self.break_off_pid, "new frame");
    }

    // ─────────────────────────────────────────────────────────────
    //  Итоги
    // ─────────────────────────────────────────────────────────────

    /// Победитель фрейма — у кого больше очков (только после конца фрейма).
    pub fn frame_winner(&self) -> Option<PlayerId> {
        if !self.frame_over {
            return None;
        }
        match self.players[0].compare(&self.players[1]) {
            Ordering::Greater => Some(0),
            Ordering::Less => Some(1),
            Ordering::Equal => None,
        }
    }

    pub fn is_frame_winner(&self, pid: PlayerId) -> bool {
        self.frame_winner() == Some(pid)
    }

    pub fn match_winner(&self) -> Option<PlayerId> {
        if !self.match_over {
            return None;
        }
        match self.players[0].compare_frames(&self.players[1]) {
            Ordering::Greater => Some(0),
            Ordering::Less => Some(1),
            Ordering::Equal => None,
        }
    }

    pub fn is_match_winner(&self, pid: PlayerId) -> bool {
        self.match_winner() == Some(pid)
    }

    pub fn has_frame_started(&self) -> bool {
        self.clock.has_started()
    }

    pub fn frame_time_ms(&self, now: Timestamp) -> i64 {
        self.clock.elapsed_ms(self.frame_over, now)
    }

    /// Проверка структурных инвариантов после декодирования снапшота.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            ));
        }
        if self.players.len() != 2 {
            return Err(format!("expected 2 players, got {}", self.players.len()));
        }
        for (idx, p) in self.players.iter().enumerate() {
            if p.pid() as usize != idx {
                return Err(format!("player at index {} has pid {}", idx, p.pid()));
            }
        }
        if self.cur_pid > 1 || self.break_off_pid > 1 {
            return Err(format!(
                "invalid pid: current {}, break-off {}",
                self.cur_pid, self.break_off_pid
            ));
        }
        if self.max_balls < NUM_COLORS
            || RedsMode::from_num_reds(self.max_balls - NUM_COLORS).is_none()
        {
            return Err(format!("invalid ball set size {}", self.max_balls));
        }
        if self.num_balls > self.max_balls {
            return Err(format!(
                "{} balls on table exceeds maximum {}",
                self.num_balls, self.max_balls
            ));
        }
        if self.match_over && !self.frame_over {
            return Err("match over while frame in progress".to_string());
        }
        Ok(())
    }
}
