//! The client's lifecycle.

/// Where the client is in a game.
///
/// ```text
/// Authenticating → FetchingInventory → Scanning ⇄ Firing
///                          │               │        │
///                          └───────────────┴────────┴→ GameOver → Quitting → Done
/// ```
///
/// - **Authenticating**: presenting the secret on every river.
/// - **FetchingInventory**: asking river 0 which cannons the player owns.
/// - **Scanning**: polling each river for this turn's sightings.
/// - **Firing**: one shot per active cannon with a target.
/// - **GameOver**: the server said the game has ended.
/// - **Quitting**: telling the server goodbye.
/// - **Done**: nothing left to do.
///
/// A fatal setup error ends the run without passing through `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Authenticating,
    FetchingInventory,
    Scanning,
    Firing,
    GameOver,
    Quitting,
    Done,
}

impl Phase {
    /// Returns `true` while turns are being played.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Scanning | Self::Firing)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Authenticating, FetchingInventory)
                | (FetchingInventory, Scanning | GameOver)
                | (Scanning, Firing | GameOver)
                | (Firing, Scanning | GameOver)
                | (GameOver, Quitting)
                | (Quitting, Done)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticating => write!(f, "Authenticating"),
            Self::FetchingInventory => write!(f, "FetchingInventory"),
            Self::Scanning => write!(f, "Scanning"),
            Self::Firing => write!(f, "Firing"),
            Self::GameOver => write!(f, "GameOver"),
            Self::Quitting => write!(f, "Quitting"),
            Self::Done => write!(f, "Done"),
        }
    }
}
