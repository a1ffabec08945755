//! Process-wide theme context.
//!
//! `ThemeState` is created once at startup and handed to every presentation
//! component that needs the current theme. It owns the store handle, so a
//! toggle both persists and notifies in one call.

use crate::model::theme::Theme;
use crate::repo::gradebook_repo::GradebookRepository;
use crate::store::{KvStore, StoreResult};
use log::info;

type ThemeListener = Box<dyn Fn(Theme)>;

pub struct ThemeState<S: KvStore> {
    repo: GradebookRepository<S>,
    current: Theme,
    listeners: Vec<ThemeListener>,
}

impl<S: KvStore> ThemeState<S> {
    /// Loads the saved theme; absent or unknown values fall back to light.
    pub fn load(store: S) -> StoreResult<Self> {
        let repo = GradebookRepository::new(store);
        let current = repo.load_theme()?.unwrap_or_default();
        Ok(Self {
            repo,
            current,
            listeners: Vec::new(),
        })
    }

    pub fn theme(&self) -> Theme {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current == Theme::Dark
    }

    /// Registers a callback run after every successful toggle.
    pub fn subscribe(&mut self, listener: impl Fn(Theme) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Flips the theme, persists it, then notifies subscribers.
    ///
    /// On a storage error the in-memory theme is left unchanged.
    pub fn toggle(&mut self) -> StoreResult<Theme> {
        let next = self.current.toggled();
        self.repo.save_theme(next)?;
        self.current = next;
        for listener in &self.listeners {
            listener(next);
        }
        info!("event=theme_toggle module=theme status=ok theme={}", next.as_str());
        Ok(next)
    }
}
