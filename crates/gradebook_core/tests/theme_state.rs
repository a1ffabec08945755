use gradebook_core::{KvStore, MemoryKvStore, Theme, ThemeState};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn theme_defaults_to_light_for_absent_or_unknown_value() {
    let store = MemoryKvStore::new();
    assert_eq!(ThemeState::load(&store).unwrap().theme(), Theme::Light);

    store.set("appTheme", "sepia").unwrap();
    assert_eq!(ThemeState::load(&store).unwrap().theme(), Theme::Light);

    store.set("appTheme", "dark").unwrap();
    assert!(ThemeState::load(&store).unwrap().is_dark());
}

#[test]
fn toggling_twice_restores_original_and_persists_each_step() {
    let store = MemoryKvStore::new();
    let mut state = ThemeState::load(&store).unwrap();
    let original = state.theme();

    let first = state.toggle().unwrap();
    assert_eq!(first, Theme::Dark);
    assert_eq!(store.get("appTheme").unwrap().as_deref(), Some("dark"));

    let second = state.toggle().unwrap();
    assert_eq!(second, original);
    assert_eq!(store.get("appTheme").unwrap().as_deref(), Some(second.as_str()));
}

#[test]
fn subscribers_receive_every_toggle() {
    let store = MemoryKvStore::new();
    let mut state = ThemeState::load(&store).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    state.subscribe(move |theme| sink.borrow_mut().push(theme));

    state.toggle().unwrap();
    state.toggle().unwrap();

    assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
}
