use super::*;

#[test]
fn append_limit_tracks_remaining_capacity() {
    let mut state = CompositionState::new();
    assert_eq!(picker_limit(&state, PickMode::Append), 4);
    state.add(PickedAsset::new("a", 4.0, 3.0).into_selection());
    state.add(PickedAsset::new("b", 4.0, 3.0).into_selection());
    assert_eq!(picker_limit(&state, PickMode::Append), 2);
    assert_eq!(picker_limit(&state, PickMode::Replace(0)), 1);

    state.add(PickedAsset::new("c", 4.0, 3.0).into_selection());
    state.add(PickedAsset::new("d", 4.0, 3.0).into_selection());
    assert_eq!(picker_limit(&state, PickMode::Append), 0);
}

#[test]
fn picks_become_fresh_selections() {
    let pick = PickedAsset::new("lib/42", 3000.0, 2000.0);
    let a = pick.clone().into_selection();
    let b = pick.into_selection();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.asset().as_str(), "lib/42");
    assert!((a.aspect_ratio() - 1.5).abs() < 1e-12);
}
