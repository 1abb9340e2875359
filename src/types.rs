//! Domain value types for the decision engine.

use serde::{Deserialize, Serialize};

/// Zone context a piece is in when a candidate move is evaluated.
///
/// The same move outcome is rewarded differently depending on whether the
/// piece sits on a protected square, stands exposed, or is still at home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Safe,
    Unsafe,
    Home,
}

impl Zone {
    pub const COUNT: usize = 3;
    pub const ALL: [Zone; Zone::COUNT] = [Zone::Safe, Zone::Unsafe, Zone::Home];

    pub fn index(self) -> usize {
        match self {
            Zone::Safe => 0,
            Zone::Unsafe => 1,
            Zone::Home => 2,
        }
    }
}

/// Outcome a candidate move produces, before zone qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Move a piece out of the base onto the track
    MoveOut,
    /// Plain move by the rolled distance
    MoveDice,
    /// Reach the goal
    Goal,
    /// Land on a star (bonus) tile
    Star,
    /// Land on a globe (protective) tile
    Globe,
    /// Stack onto an own piece
    Protect,
    /// Capture an opponent piece
    Kill,
    /// Be captured by an opponent
    Die,
    /// Enter the goal stretch
    GoalZone,
}

impl MoveKind {
    pub const COUNT: usize = 9;
    pub const ALL: [MoveKind; MoveKind::COUNT] = [
        MoveKind::MoveOut,
        MoveKind::MoveDice,
        MoveKind::Goal,
        MoveKind::Star,
        MoveKind::Globe,
        MoveKind::Protect,
        MoveKind::Kill,
        MoveKind::Die,
        MoveKind::GoalZone,
    ];

    pub fn index(self) -> usize {
        match self {
            MoveKind::MoveOut => 0,
            MoveKind::MoveDice => 1,
            MoveKind::Goal => 2,
            MoveKind::Star => 3,
            MoveKind::Globe => 4,
            MoveKind::Protect => 5,
            MoveKind::Kill => 6,
            MoveKind::Die => 7,
            MoveKind::GoalZone => 8,
        }
    }
}

/// Zone-qualified move outcome; the column coordinate of the learning tables.
///
/// Categories are laid out zone-major: the `Safe` block first, then `Unsafe`,
/// then `Home`, with kinds in [`MoveKind::ALL`] order inside each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionCategory {
    pub zone: Zone,
    pub kind: MoveKind,
}

impl ActionCategory {
    pub const COUNT: usize = Zone::COUNT * MoveKind::COUNT;

    pub const fn new(zone: Zone, kind: MoveKind) -> Self {
        Self { zone, kind }
    }

    /// Flat column index of this category.
    pub fn index(self) -> usize {
        self.zone.index() * MoveKind::COUNT + self.kind.index()
    }

    /// Inverse of [`ActionCategory::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::COUNT {
            return None;
        }
        let zone = Zone::ALL[index / MoveKind::COUNT];
        let kind = MoveKind::ALL[index % MoveKind::COUNT];
        Some(Self { zone, kind })
    }

    /// Iterate over the full authored category set in index order.
    pub fn all() -> impl Iterator<Item = ActionCategory> {
        Zone::ALL
            .into_iter()
            .flat_map(|zone| MoveKind::ALL.into_iter().map(move |kind| Self { zone, kind }))
    }
}

/// A (situational state, action category) table cell chosen by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateAction {
    /// Row index: the piece's situational state before the move
    pub state: usize,
    /// Column index: the category of outcome the move produces
    pub category: usize,
}

impl StateAction {
    pub const fn new(state: usize, category: usize) -> Self {
        Self { state, category }
    }
}
