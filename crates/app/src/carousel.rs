//! Category carousel
//!
//! `CarouselState` is the pure index machine; `CarouselScheduler` drives it
//! from a tokio interval until the user touches it.

use crate::lock;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// A browsable subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Subject filter value sent to the catalog
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: [Category; 8] = [
    Category {
        key: "fiction",
        name: "Fiction",
        description: "Imaginative stories and novels",
    },
    Category {
        key: "science",
        name: "Science",
        description: "Scientific research and discoveries",
    },
    Category {
        key: "history",
        name: "History",
        description: "Historical events and biographies",
    },
    Category {
        key: "fantasy",
        name: "Fantasy",
        description: "Magical worlds and adventures",
    },
    Category {
        key: "romance",
        name: "Romance",
        description: "Love stories and relationships",
    },
    Category {
        key: "mystery",
        name: "Mystery",
        description: "Suspense and detective stories",
    },
    Category {
        key: "biography",
        name: "Biography",
        description: "Life stories of notable people",
    },
    Category {
        key: "technology",
        name: "Technology",
        description: "Computing and digital innovation",
    },
];

pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.key == key)
}

/// Window position over a strip of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    current_index: usize,
    auto_playing: bool,
    item_count: usize,
    items_per_view: usize,
}

impl CarouselState {
    pub fn new(item_count: usize, items_per_view: usize) -> Self {
        Self {
            current_index: 0,
            auto_playing: true,
            item_count,
            items_per_view,
        }
    }

    /// Highest valid start index
    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.items_per_view)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_playing
    }

    /// Indices of the items currently shown
    pub fn visible(&self) -> Range<usize> {
        let end = (self.current_index + self.items_per_view).min(self.item_count);
        self.current_index..end
    }

    /// Autoplay step; does nothing once paused
    ///
    /// Returns whether the carousel is still auto playing.
    pub fn tick(&mut self) -> bool {
        if self.auto_playing {
            self.current_index = self.step_forward();
        }
        self.auto_playing
    }

    pub fn next(&mut self) {
        self.pause();
        self.current_index = self.step_forward();
    }

    pub fn previous(&mut self) {
        self.pause();
        self.current_index = if self.current_index == 0 {
            self.max_index()
        } else {
            self.current_index - 1
        };
    }

    /// Moves to `index`, clamped into range
    pub fn jump(&mut self, index: usize) {
        self.pause();
        self.current_index = index.min(self.max_index());
    }

    /// Stops autoplay for good
    pub fn pause(&mut self) {
        self.auto_playing = false;
    }

    fn step_forward(&self) -> usize {
        if self.current_index >= self.max_index() {
            0
        } else {
            self.current_index + 1
        }
    }
}

/// Owns a `CarouselState` and the timer that advances it
///
/// The timer task is aborted on the first manual navigation and when the
/// scheduler is dropped. A zero interval starts paused with no timer.
/// Must be created inside a tokio runtime.
pub struct CarouselScheduler {
    state: Arc<Mutex<CarouselState>>,
    timer: Option<JoinHandle<()>>,
}

impl CarouselScheduler {
    pub fn start(item_count: usize, items_per_view: usize, interval: Duration) -> Self {
        let state = Arc::new(Mutex::new(CarouselState::new(item_count, items_per_view)));
        if interval.is_zero() {
            log::warn!("Carousel interval is zero, autoplay disabled");
            lock(&state).pause();
            return Self { state, timer: None };
        }

        let timer = Some(Self::spawn_timer(Arc::clone(&state), interval));
        Self { state, timer }
    }

    /// Scheduler over the category catalogue
    pub fn for_categories(items_per_view: usize, interval: Duration) -> Self {
        Self::start(CATEGORIES.len(), items_per_view, interval)
    }

    fn spawn_timer(state: Arc<Mutex<CarouselState>>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            loop {
                ticker.tick().await;
                if !lock(&state).tick() {
                    break;
                }
            }
        })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CarouselState {
        lock(&self.state).clone()
    }

    pub fn current_index(&self) -> usize {
        lock(&self.state).current_index()
    }

    pub fn is_auto_playing(&self) -> bool {
        lock(&self.state).is_auto_playing()
    }

    pub fn next(&mut self) {
        self.navigate(CarouselState::next);
    }

    pub fn previous(&mut self) {
        self.navigate(CarouselState::previous);
    }

    pub fn jump(&mut self, index: usize) {
        self.navigate(|state| state.jump(index));
    }

    /// Pauses without moving
    pub fn pause(&mut self) {
        self.navigate(CarouselState::pause);
    }

    fn navigate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CarouselState),
    {
        self.stop_timer();
        let mut state = lock(&self.state);
        f(&mut *state);
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            log::debug!("Carousel autoplay stopped");
        }
    }
}

impl Drop for CarouselScheduler {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
