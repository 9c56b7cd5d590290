//! Random redirect target selection for `/random`.

use std::fmt;

use rand::Rng;

/// The routes `/random` may send a client to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RouteName {
    Index,
    SampleDictView,
    JsonView,
    DictView,
    SampleListView,
}

impl RouteName {
    /// In draw order: `ALL[i]` is the route for draw `i + 1`.
    pub const ALL: [RouteName; 5] = [
        RouteName::Index,
        RouteName::SampleDictView,
        RouteName::JsonView,
        RouteName::DictView,
        RouteName::SampleListView,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Index          => "/",
            Self::SampleDictView => "/sample",
            Self::JsonView       => "/json",
            Self::DictView       => "/dict",
            Self::SampleListView => "/list",
        }
    }

    /// Maps a draw in `1..=5` to its route. `None` outside that range.
    pub fn from_draw(draw: u8) -> Option<Self> {
        match draw {
            1 => Some(Self::Index),
            2 => Some(Self::SampleDictView),
            3 => Some(Self::JsonView),
            4 => Some(Self::DictView),
            5 => Some(Self::SampleListView),
            _ => None,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Index          => "index",
            Self::SampleDictView => "sample_dict_view",
            Self::JsonView       => "json_view",
            Self::DictView       => "dict_view",
            Self::SampleListView => "sample_list_view",
        };
        f.write_str(name)
    }
}

/// Picks a route uniformly at random using the thread-local RNG.
pub fn select() -> RouteName {
    select_with(&mut rand::thread_rng())
}

/// Picks a route uniformly at random from `rng`.
pub fn select_with<R: Rng + ?Sized>(rng: &mut R) -> RouteName {
    RouteName::ALL[rng.gen_range(0..RouteName::ALL.len())]
}
