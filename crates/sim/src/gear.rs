use std::fmt;

/// The gear currently selected on a five-speed gearbox.
///
/// `Neutral` transmits no torque and carries a ratio of zero.
/// The numbered gears map onto [`GearRatios`](crate::config::GearRatios).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gear {
    #[default]
    Neutral,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl Gear {
    /// Every gear, from neutral to fifth.
    pub const ALL: [Gear; 6] = [
        Gear::Neutral,
        Gear::First,
        Gear::Second,
        Gear::Third,
        Gear::Fourth,
        Gear::Fifth,
    ];

    /// Returns the gear number (`1..=5`), or `None` for neutral.
    #[must_use]
    pub fn number(self) -> Option<u8> {
        match self {
            Gear::Neutral => None,
            Gear::First => Some(1),
            Gear::Second => Some(2),
            Gear::Third => Some(3),
            Gear::Fourth => Some(4),
            Gear::Fifth => Some(5),
        }
    }

    /// Returns the gear for a number in `1..=5`, or `None` otherwise.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Gear::First),
            2 => Some(Gear::Second),
            3 => Some(Gear::Third),
            4 => Some(Gear::Fourth),
            5 => Some(Gear::Fifth),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self == Gear::Neutral
    }

    /// The next gear up. Fifth is the top of the box and stays put.
    #[must_use]
    pub fn up(self) -> Self {
        match self {
            Gear::Neutral => Gear::First,
            Gear::First => Gear::Second,
            Gear::Second => Gear::Third,
            Gear::Third => Gear::Fourth,
            Gear::Fourth | Gear::Fifth => Gear::Fifth,
        }
    }

    /// The next gear down. First drops to neutral; neutral stays put.
    #[must_use]
    pub fn down(self) -> Self {
        match self {
            Gear::Neutral | Gear::First => Gear::Neutral,
            Gear::Second => Gear::First,
            Gear::Third => Gear::Second,
            Gear::Fourth => Gear::Third,
            Gear::Fifth => Gear::Fourth,
        }
    }
}

/// Renders `N` for neutral and the gear number otherwise.
impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("N"),
        }
    }
}
