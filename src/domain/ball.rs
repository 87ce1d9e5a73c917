use serde::{Deserialize, Serialize};

/// Стоимость шара в очках (1 — красный, 2..=7 — цветные).
pub type BallValue = u32;

/// Количество цветных шаров на столе (жёлтый..чёрный).
pub const NUM_COLORS: u32 = 6;

/// Стоимость красного.
pub const RED_VALUE: BallValue = 1;

/// Стоимость чёрного — самого дорогого шара.
pub const BLACK_VALUE: BallValue = 7;

/// Цветные шары в порядке "зачистки" стола: от жёлтого к чёрному.
pub const COLOR_VALUES: [BallValue; NUM_COLORS as usize] = [2, 3, 4, 5, 6, 7];

/// Шар снукера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ball {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Ball {
    pub const ALL: [Ball; 7] = [
        Ball::Red,
        Ball::Yellow,
        Ball::Green,
        Ball::Brown,
        Ball::Blue,
        Ball::Pink,
        Ball::Black,
    ];

    pub fn value(self) -> BallValue {
        match self {
            Ball::Red => 1,
            Ball::Yellow => 2,
            Ball::Green => 3,
            Ball::Brown => 4,
            Ball::Blue => 5,
            Ball::Pink => 6,
            Ball::Black => 7,
        }
    }

    pub fn from_value(value: BallValue) -> Option<Ball> {
        Ball::ALL.iter().copied().find(|b| b.value() == value)
    }

    pub fn is_red(self) -> bool {
        matches!(self, Ball::Red)
    }

    /// Позиция цвета в очереди зачистки, считая с конца (чёрный = 1, жёлтый = 6).
    ///
    /// Для красного возвращает `BLACK_VALUE` (= 7): ни одна проверка
    /// "цвет ещё на столе" для него не проходит.
    pub fn clearing_rank(self) -> u32 {
        BLACK_VALUE - self.value() + 1
    }
}
