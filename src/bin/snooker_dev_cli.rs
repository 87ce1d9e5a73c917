// src/bin/snooker_dev_cli.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use snooker_engine::api::build_controller_view;
use snooker_engine::domain::{BreakOff, MatchOptions, RedsMode};
use snooker_engine::engine::{legal_actions, Clock, HistoryController, HistoryError, MatchAction};
use snooker_engine::infra::{
    slot_key, DeterministicRng, FileSaveStore, InMemorySaveStore, SaveStore, SystemClock,
};

/// Сколько действий максимум на один матч (страховка от бесконечного цикла).
const MAX_STEPS: usize = 5_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("snooker_dev_cli: симуляция матча best-of-3 на 6 красных…");

    // Куда сохранять: аргумент, переменная окружения, иначе в память.
    let save_dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SNOOKER_SAVE_DIR").ok());

    let result = match save_dir {
        Some(dir) => {
            println!("Сохранения: {}", dir);
            run(FileSaveStore::new(dir))
        }
        None => {
            println!("Сохранения: in-memory");
            run(InMemorySaveStore::new())
        }
    };

    if let Err(err) = result {
        eprintln!("Ошибка: {}", err);
        std::process::exit(1);
    }
}

fn run<S: SaveStore>(store: S) -> Result<(), HistoryError> {
    let mut controller = HistoryController::new(store, SystemClock)?;
    let mut coin = DeterministicRng::from_seed(7);
    let mut dice = StdRng::seed_from_u64(42);

    let options = MatchOptions::new(["Ronnie".to_string(), "Judd".to_string()])
        .with_reds(RedsMode::Six)
        .with_max_frames(3)
        .with_break_off(BreakOff::Random);

    controller.start_new_match(&options, &mut coin)?;
    println!("Слот сохранения: {}", controller.save_slot());

    let mut steps = 0;
    while steps < MAX_STEPS {
        let Some(state) = controller.current() else {
            break;
        };
        if state.is_match_over() {
            break;
        }

        let Some(action) = pick_action(&legal_actions(state), &mut dice) else {
            break;
        };

        if action == MatchAction::NewFrame {
            print_scoreboard(&controller);
        }

        controller.apply(action)?;
        steps += 1;
    }

    print_scoreboard(&controller);

    // Немного истории: два шага назад и один вперёд.
    controller.undo()?;
    controller.undo()?;
    controller.redo()?;
    println!(
        "После undo/undo/redo: курсор {} из {}",
        controller.cursor(),
        controller.len()
    );

    // Сохраняем и поднимаем тот же слот в свежем контроллере.
    let slot = controller.save_slot();
    controller.save()?;

    let mut resumed = HistoryController::new(copy_slot(&controller)?, SystemClock)?;
    if resumed.load(slot)? {
        println!(
            "Загружено из слота {}: {} снапшотов, курсор {}",
            slot,
            resumed.len(),
            resumed.cursor()
        );
    }

    Ok(())
}

/// Копия слота из рабочего хранилища в память: история должна пережить перезапуск.
fn copy_slot<S: SaveStore, C: Clock>(
    controller: &HistoryController<S, C>,
) -> Result<InMemorySaveStore, HistoryError> {
    let mut copy = InMemorySaveStore::new();
    let key = slot_key(controller.save_slot());
    if let Some(json) = controller.store().get(&key)? {
        copy.set(&key, &json)?;
    }
    Ok(copy)
}

/// Простая "игровая" политика: чаще забиваем, иногда промах, редко фол.
fn pick_action(legal: &[MatchAction], dice: &mut StdRng) -> Option<MatchAction> {
    if legal.contains(&MatchAction::NewFrame) {
        return Some(MatchAction::NewFrame);
    }

    let pots: Vec<&MatchAction> = legal
        .iter()
        .filter(|a| matches!(a, MatchAction::PotBall(_)))
        .collect();
    let fouls: Vec<&MatchAction> = legal
        .iter()
        .filter(|a| matches!(a, MatchAction::CommitFoul(_)))
        .collect();

    let roll = dice.gen_range(0..100);
    if roll < 65 && !pots.is_empty() {
        return Some(pots[dice.gen_range(0..pots.len())].clone());
    }
    if roll < 72 && !fouls.is_empty() {
        return Some(fouls[dice.gen_range(0..fouls.len())].clone());
    }
    if legal.contains(&MatchAction::EndTurn) {
        return Some(MatchAction::EndTurn);
    }
    None
}

fn print_scoreboard<S: SaveStore>(controller: &HistoryController<S, SystemClock>) {
    let Some(view) = build_controller_view(controller) else {
        println!("(матч не начат)");
        return;
    };

    println!();
    println!(
        "==== {:?} | фреймов сыграно: {} | шаров на столе: {} | осталось очков: {} ====",
        view.phase, view.frames_played, view.num_balls_on_table, view.points_remaining
    );
    for p in &view.players {
        println!(
            "  [{}] {:<8} очки {:>3}  фреймы {}  брейк фрейма {:>3}  брейк матча {:>3}{}",
            p.pid,
            p.name,
            p.points,
            p.frame_wins,
            p.frame_high_break,
            p.match_high_break,
            if p.is_frame_winner { "  <- фрейм" } else { "" }
        );
    }
}
