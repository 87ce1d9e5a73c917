// tests/engine_core_test.rs

use snooker_engine::domain::{BreakOff, MatchOptions, RedsMode};
use snooker_engine::engine::{
    legal_actions, MatchAction, MatchPhase, MatchState, RandomSource, SNAPSHOT_FORMAT_VERSION,
};

/// Жребий с заранее известным исходом.
struct FixedCoin(bool);

impl RandomSource for FixedCoin {
    fn coin_flip(&mut self) -> bool {
        self.0
    }
}

fn options(reds: RedsMode, max_frames: u32) -> MatchOptions {
    MatchOptions::new(["Ronnie".to_string(), "Judd".to_string()])
        .with_reds(reds)
        .with_max_frames(max_frames)
        .with_break_off(BreakOff::Player(0))
}

fn new_state(reds: RedsMode, max_frames: u32) -> MatchState {
    MatchState::new(&options(reds, max_frames), &mut FixedCoin(true), 1_000).unwrap()
}

/// Убрать со стола всё, кроме `left` шаров.
fn strip_table(state: &mut MatchState, left: u32) {
    while state.num_balls_on_table() > left {
        state.adjust_balls(-1, 1_000).unwrap();
    }
}

//
// Новый матч
//
#[test]
fn new_match_starts_with_full_table() {
    let state = new_state(RedsMode::Fifteen, 0);

    assert_eq!(state.format_version(), SNAPSHOT_FORMAT_VERSION);
    assert_eq!(state.timestamp(), 1_000);
    assert_eq!(state.max_balls(), 21);
    assert_eq!(state.num_balls_on_table(), 21);
    assert_eq!(state.num_reds(), 15);
    assert_eq!(state.num_colors_remaining(), 6);
    assert_eq!(state.points_remaining_on_table(), 147);
    assert_eq!(state.current_player_id(), 0);
    assert_eq!(state.break_off_player_id(), 0);
    assert_eq!(state.frames_played(), 0);
    assert_eq!(state.phase(), MatchPhase::InProgress);
    assert!(!state.red_just_potted());
    assert!(!state.foul());
    assert!(!state.respot_black());
    assert!(!state.has_frame_started());
    assert_eq!(state.players()[1].name(), "Judd");
}

#[test]
fn points_remaining_for_each_reds_mode() {
    assert_eq!(new_state(RedsMode::Six, 0).points_remaining_on_table(), 75);
    assert_eq!(new_state(RedsMode::Ten, 0).points_remaining_on_table(), 107);
}

#[test]
fn random_break_off_follows_coin() {
    let opts = options(RedsMode::Six, 0).with_break_off(BreakOff::Random);

    let heads = MatchState::new(&opts, &mut FixedCoin(true), 1).unwrap();
    let tails = MatchState::new(&opts, &mut FixedCoin(false), 1).unwrap();

    assert_eq!(heads.break_off_player_id(), 0);
    assert_eq!(tails.break_off_player_id(), 1);
    assert_eq!(tails.current_player_id(), 1);
}

#[test]
fn invalid_options_are_rejected() {
    let opts = MatchOptions::new(["Same".to_string(), "same".to_string()]);
    assert!(MatchState::new(&opts, &mut FixedCoin(true), 1).is_err());
}

#[test]
fn ball_counters_for_buttons() {
    let mut state = new_state(RedsMode::Six, 0);

    assert_eq!(state.num_balls(0), 12);
    assert_eq!(state.num_balls(1), 6);
    assert_eq!(state.num_balls(2), 1);
    assert_eq!(state.num_balls(7), 1);
    assert_eq!(state.num_balls(9), 0);

    // остались синий, розовый, чёрный
    strip_table(&mut state, 3);
    assert_eq!(state.num_balls(1), 0);
    assert_eq!(state.num_balls(4), 0);
    assert_eq!(state.num_balls(5), 1);
    assert_eq!(state.points_remaining_on_table(), 18);
}

//
// Забитые шары
//
#[test]
fn scenario_red_then_black_keeps_turn() {
    let mut state = new_state(RedsMode::Ten, 0);
    assert_eq!(state.num_balls_on_table(), 16);

    state.pot_ball(1, 2_000).unwrap();
    assert!(state.red_just_potted());
    assert_eq!(state.num_balls_on_table(), 15);

    state.pot_ball(7, 3_000).unwrap();

    assert_eq!(state.current_player_id(), 0);
    assert_eq!(state.players()[0].points, 8);
    assert!(!state.red_just_potted());
    // чёрный вернулся на стол
    assert_eq!(state.num_balls_on_table(), 15);
    assert_eq!(state.num_reds(), 9);
    assert_eq!(state.players()[0].current_break_total(), 8);
}

#[test]
fn color_needs_red_first_while_reds_remain() {
    let state = new_state(RedsMode::Fifteen, 0);

    assert!(state.can_pot_ball(1));
    for value in 2..=7 {
        assert!(!state.can_pot_ball(value), "color {} potted before red", value);
    }
    assert!(!state.can_pot_ball(0));
    assert!(!state.can_pot_ball(8));
}

#[test]
fn any_color_after_red() {
    let mut state = new_state(RedsMode::Fifteen, 0);
    state.pot_ball(1, 2_000).unwrap();

    for value in 2..=7 {
        assert!(state.can_pot_ball(value));
    }
    // два красных подряд тоже можно (несколько красных за удар)
    assert!(state.can_pot_ball(1));
}

#[test]
fn clearance_takes_colors_in_order_and_ends_frame() {
    let mut state = new_state(RedsMode::Six, 0);
    let mut t = 2_000;

    for _ in 0..6 {
        state.pot_ball(1, t).unwrap();
        state.pot_ball(7, t + 1).unwrap();
        t += 10;
    }
    assert_eq!(state.num_balls_on_table(), 6);
    assert_eq!(state.players()[0].points, 48);

    // порядок цветов строгий
    assert!(!state.can_pot_ball(3));
    assert!(!state.can_pot_ball(7));
    assert!(state.can_pot_ball(2));

    for value in 2..=7 {
        assert!(state.can_pot_ball(value));
        state.pot_ball(value, t).unwrap();
        t += 10;
    }

    assert_eq!(state.num_balls_on_table(), 0);
    assert!(state.is_frame_over());
    assert_eq!(state.phase(), MatchPhase::FrameOver);
    assert_eq!(state.frame_winner(), Some(0));
    assert_eq!(state.frames_played(), 1);

    let ronnie = &state.players()[0];
    assert_eq!(ronnie.points, 75);
    assert_eq!(ronnie.frame_wins, 1);
    assert_eq!(ronnie.frame_high_break, 75);
    assert_eq!(ronnie.match_high_break, 75);
    assert_eq!(ronnie.frame_balls_potted, 18);
    assert_eq!(ronnie.last_break_total(), 75);
}

#[test]
fn points_remaining_never_increases_on_pot() {
    let mut state = new_state(RedsMode::Six, 0);
    let before = state.points_remaining_on_table();

    state.pot_ball(1, 2_000).unwrap();
    let after_red = state.points_remaining_on_table();
    assert_eq!(after_red, before - 8);

    state.pot_ball(6, 2_100).unwrap();
    assert_eq!(state.points_remaining_on_table(), after_red);
}

//
// Смена хода и фолы
//
#[test]
fn end_turn_switches_player_and_closes_break() {
    let mut state = new_state(RedsMode::Fifteen, 0);

    state.pot_ball(1, 2_000).unwrap();
    state.pot_ball(5, 3_000).unwrap();
    state.end_turn(4_000).unwrap();

    assert_eq!(state.current_player_id(), 1);
    assert!(!state.red_just_potted());
    assert_eq!(state.players()[0].last_break_total(), 6);
    assert!(state.players()[0].current_break().is_empty());
    assert!(state.is_current_player(1));
    assert!(!state.is_current_player(0));
}

#[test]
fn foul_awards_points_to_opponent_and_flags_incoming_player() {
    let mut state = new_state(RedsMode::Fifteen, 0);

    state.commit_foul(4, 2_000).unwrap();

    assert_eq!(state.current_player_id(), 1);
    assert_eq!(state.players()[1].points, 4);
    assert_eq!(state.players()[0].points, 0);
    assert_eq!(state.players()[0].last_break(), &[-4]);
    assert!(state.foul());
    // фол ничего не убирает со стола
    assert_eq!(state.num_balls_on_table(), 21);

    // следующий удар снимает флаг
    state.pot_ball(1, 3_000).unwrap();
    assert!(!state.foul());
}

#[test]
fn foul_value_limited_by_colors_on_table() {
    let mut state = new_state(RedsMode::Six, 0);

    // 1 очко за фол не бывает
    assert!(!state.can_commit_foul(1));
    assert!(state.can_commit_foul(4));
    assert!(state.can_commit_foul(7));

    // остались розовый и чёрный
    strip_table(&mut state, 2);
    assert!(!state.can_commit_foul(4));
    assert!(!state.can_commit_foul(5));
    assert!(state.can_commit_foul(6));
    assert!(state.can_commit_foul(7));
}

#[test]
fn scenario_foul_on_last_black_ends_frame() {
    let mut state = new_state(RedsMode::Six, 0);
    strip_table(&mut state, 1);
    state.edit_points(1, 5, 1_500).unwrap();

    assert_eq!(state.points_remaining_on_table(), 7);
    assert_eq!(state.current_player_id(), 0);

    state.commit_foul(7, 2_000).unwrap();

    assert!(state.is_frame_over());
    assert_eq!(state.num_balls_on_table(), 0);
    assert_eq!(state.players()[1].points, 12);
    assert_eq!(state.frame_winner(), Some(1));
    assert!(state.is_frame_winner(1));
    assert_eq!(state.players()[1].frame_wins, 1);
}

#[test]
fn tie_after_last_black_respots_it() {
    let mut state = new_state(RedsMode::Six, 0);
    strip_table(&mut state, 1);
    state.edit_points(1, 7, 1_500).unwrap();

    state.pot_ball(7, 2_000).unwrap();

    // 7:7 — чёрный переустанавливается, бьёт соперник
    assert!(!state.is_frame_over());
    assert!(state.respot_black());
    assert_eq!(state.num_balls_on_table(), 1);
    assert_eq!(state.current_player_id(), 1);
    assert_eq!(state.points_remaining_on_table(), 7);

    state.pot_ball(7, 3_000).unwrap();

    assert!(state.is_frame_over());
    assert_eq!(state.frame_winner(), Some(1));
    assert!(!state.respot_black());
}

#[test]
fn frame_not_over_while_snookers_possible() {
    let mut state = new_state(RedsMode::Six, 0);
    // розовый и чёрный, отрыв 20 > 13 очков на столе
    strip_table(&mut state, 2);
    state.edit_points(0, 20, 1_500).unwrap();

    state.end_turn(2_000).unwrap();

    assert!(!state.is_frame_over());
    assert_eq!(state.current_player_id(), 1);
}

#[test]
fn missed_last_black_ends_frame_when_behind() {
    let mut state = new_state(RedsMode::Six, 0);
    strip_table(&mut state, 1);
    state.edit_points(0, 20, 1_500).unwrap();

    // на столе 7, соперник отстаёт на 20
    state.end_turn(2_000).unwrap();

    assert!(state.is_frame_over());
    assert_eq!(state.frame_winner(), Some(0));
}

//
// Конец фрейма и матча
//
#[test]
fn scenario_end_frame_rejected_on_tie() {
    let mut state = new_state(RedsMode::Fifteen, 0);

    assert!(!state.can_end_frame());
    assert!(state.end_frame(2_000).is_err());

    state.edit_points(0, 5, 2_000).unwrap();
    state.edit_points(1, 5, 2_000).unwrap();
    assert!(!state.can_end_frame());

    state.edit_points(1, 1, 2_000).unwrap();
    assert!(state.can_end_frame());
    state.end_frame(3_000).unwrap();
    assert_eq!(state.frame_winner(), Some(1));
}

#[test]
fn frame_over_blocks_everything_but_new_frame() {
    let mut state = new_state(RedsMode::Six, 0);
    state.edit_points(0, 1, 1_500).unwrap();
    state.end_frame(2_000).unwrap();

    assert!(!state.can_pot_ball(1));
    assert!(!state.can_commit_foul(7));
    assert!(!state.can_end_turn());
    assert!(!state.can_end_frame());
    assert!(!state.can_adjust_balls(-1));
    assert!(!state.can_edit_points(0, 1));
    assert!(state.can_new_frame());
    assert!(!state.is_current_player(0));
    assert!(!state.is_current_player(1));

    assert_eq!(legal_actions(&state), vec![MatchAction::NewFrame]);
}

#[test]
fn new_frame_alternates_break_off_and_keeps_match_stats() {
    let mut state = new_state(RedsMode::Six, 0);
    state.pot_ball(1, 2_000).unwrap();
    state.pot_ball(7, 2_500).unwrap();
    state.end_frame(3_000).unwrap();

    state.new_frame(10_000).unwrap();

    assert_eq!(state.phase(), MatchPhase::InProgress);
    assert_eq!(state.timestamp(), 10_000);
    assert_eq!(state.break_off_player_id(), 1);
    assert_eq!(state.current_player_id(), 1);
    assert_eq!(state.num_balls_on_table(), 12);
    assert!(!state.has_frame_started());

    let ronnie = &state.players()[0];
    assert_eq!(ronnie.points, 0);
    assert_eq!(ronnie.frame_high_break, 0);
    assert_eq!(ronnie.frame_wins, 1);
    assert_eq!(ronnie.match_high_break, 8);
    assert_eq!(ronnie.match_balls_potted, 2);

    state.edit_points(1, 1, 11_000).unwrap();
    state.end_frame(12_000).unwrap();
    state.new_frame(13_000).unwrap();
    assert_eq!(state.break_off_player_id(), 0);
}

#[test]
fn scenario_best_of_five_ends_after_three_wins() {
    let mut state = new_state(RedsMode::Six, 5);

    for frame in 1..=3u32 {
        state.edit_points(0, 1, 1_000).unwrap();
        state.end_frame(2_000).unwrap();
        assert_eq!(state.players()[0].frame_wins, frame);

        if frame < 3 {
            assert!(!state.is_match_over());
            state.new_frame(3_000).unwrap();
        }
    }

    assert!(state.is_match_over());
    assert_eq!(state.phase(), MatchPhase::MatchOver);
    assert!(!state.can_new_frame());
    assert!(state.new_frame(4_000).is_err());
    assert_eq!(state.match_winner(), Some(0));
    assert!(state.is_match_winner(0));
    assert!(legal_actions(&state).is_empty());
}

#[test]
fn unlimited_match_never_ends() {
    let mut state = new_state(RedsMode::Six, 0);

    for _ in 0..5 {
        state.edit_points(1, 1, 1_000).unwrap();
        state.end_frame(2_000).unwrap();
        assert!(!state.is_match_over());
        state.new_frame(3_000).unwrap();
    }

    assert_eq!(state.players()[1].frame_wins, 5);
    assert_eq!(state.match_winner(), None);
}

//
// Ручные правки
//
#[test]
fn adjust_balls_bounded_by_table() {
    let mut state = new_state(RedsMode::Six, 0);

    assert!(!state.can_adjust_balls(1));
    assert!(state.can_adjust_balls(-1));
    assert!(!state.can_adjust_balls(2));
    assert!(!state.can_adjust_balls(0));

    state.adjust_balls(-1, 1_500).unwrap();
    assert_eq!(state.num_balls_on_table(), 11);
    assert!(state.can_adjust_balls(1));

    strip_table(&mut state, 0);
    assert!(!state.can_adjust_balls(-1));
    assert_eq!(state.points_remaining_on_table(), 0);
}

#[test]
fn edit_points_cannot_go_negative() {
    let mut state = new_state(RedsMode::Six, 0);

    assert!(!state.can_edit_points(0, -1));
    state.edit_points(0, 3, 1_500).unwrap();
    assert!(state.can_edit_points(0, -3));
    assert!(!state.can_edit_points(0, -4));

    state.edit_points(0, -2, 1_600).unwrap();
    assert_eq!(state.players()[0].points, 1);
    // правка не трогает ход и брейк
    assert_eq!(state.current_player_id(), 0);
    assert!(state.players()[0].current_break().is_empty());
}

#[test]
fn edit_points_rejects_out_of_range_delta() {
    let mut state = new_state(RedsMode::Six, 0);
    state.pot_ball(1, 1_500).unwrap();

    assert!(!state.can_edit_points(0, i64::MAX));
    assert!(!state.can_edit_points(0, i64::MIN));
    assert!(!state.can_edit_points(0, u32::MAX as i64 + 1));
    assert!(state.edit_points(0, u32::MAX as i64 + 10, 1_600).is_err());
    assert_eq!(state.players()[0].points, 1);

    // ровно до u32::MAX — можно
    assert!(state.can_edit_points(0, u32::MAX as i64 - 1));
    state.edit_points(0, u32::MAX as i64 - 1, 1_700).unwrap();
    assert_eq!(state.players()[0].points, u32::MAX);
    assert!(!state.can_edit_points(0, 1));

    // дальнейшие очки упираются в потолок
    state.pot_ball(1, 1_800).unwrap();
    assert_eq!(state.players()[0].points, u32::MAX);
}

//
// Время
//
#[test]
fn shot_timing_and_frame_clock() {
    let mut state = new_state(RedsMode::Six, 0);
    assert_eq!(state.frame_time_ms(5_000), 0);

    state.pot_ball(1, 1_000).unwrap();
    assert!(state.has_frame_started());
    state.end_turn(4_000).unwrap();
    state.end_turn(10_000).unwrap();

    let ronnie = &state.players()[0];
    assert_eq!(ronnie.frame_shots(), 2);
    assert_eq!(ronnie.average_shot_time_ms(), Some(1_500));
    assert_eq!(state.players()[1].average_shot_time_ms(), Some(6_000));

    assert_eq!(state.frame_time_ms(12_000), 11_000);

    // правка очков и конец фрейма — не удары
    state.edit_points(1, 2, 15_000).unwrap();
    state.end_frame(20_000).unwrap();
    assert_eq!(state.players()[1].frame_shots(), 1);
    assert_eq!(state.frame_time_ms(99_999), 19_000);
}

//
// Доступные действия
//
#[test]
fn legal_actions_at_break_off() {
    let state = new_state(RedsMode::Fifteen, 0);
    let legal = legal_actions(&state);

    assert!(legal.contains(&MatchAction::PotBall(1)));
    assert!(!legal.contains(&MatchAction::PotBall(7)));
    assert!(legal.contains(&MatchAction::CommitFoul(4)));
    assert!(!legal.contains(&MatchAction::CommitFoul(1)));
    assert!(legal.contains(&MatchAction::EndTurn));
    assert!(!legal.contains(&MatchAction::EndFrame));
    assert!(!legal.contains(&MatchAction::NewFrame));
    assert!(!legal.contains(&MatchAction::AdjustBalls(1)));
    assert!(legal.contains(&MatchAction::AdjustBalls(-1)));
    assert!(legal.contains(&MatchAction::EditPoints { pid: 1, delta: 1 }));
    assert_eq!(legal.iter().filter(|a| a.is_shot()).count(), 1 + 6 + 1);
    assert!(!legal.contains(&MatchAction::EditPoints { pid: 1, delta: -1 }));
}
