//! Property-based tests for session and credential invariants.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use autoplaylist::auth::{parse_callback, Callback, CredentialVault};
use autoplaylist::review::ReviewSet;
use autoplaylist::secrets::MemorySecretStore;
use autoplaylist::session::{
    GeneratedResults, Playlist, PlaylistKind, SessionState, SettingsPatch, MIN_ARTIST_APPEARANCES,
};

/// Strategy for opaque credential strings as a backend would issue them.
fn credential() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._~-]{1,64}"
}

fn playlist(id: String) -> Playlist {
    Playlist {
        name: format!("Playlist {id}"),
        id,
        track_count: 1,
        kind: PlaylistKind::Playlist,
    }
}

/// Strategy for generated results with a handful of groups per generator.
fn results() -> impl Strategy<Value = GeneratedResults> {
    let groups = || {
        prop::collection::btree_map("[A-Za-z ]{1,12}", prop::collection::vec("t[0-9]{1,3}", 0..5), 0..4)
    };
    (groups(), groups(), groups()).prop_map(|(genre, language, artist)| GeneratedResults {
        genre,
        language,
        artist,
    })
}

proptest! {
    /// A stored pair loads back exactly.
    #[test]
    fn credential_pair_round_trips_through_vault(
        access in credential(),
        refresh in proptest::option::of(credential()),
    ) {
        let store = MemorySecretStore::new();
        let session = SessionState::new();
        session.set_credential_pair(access.clone(), refresh.clone().unwrap_or_default());
        CredentialVault::new(Box::new(store.clone())).save(&session).unwrap();

        let restored = SessionState::new();
        let loaded = CredentialVault::new(Box::new(store)).load(&restored).unwrap();

        prop_assert!(loaded);
        prop_assert_eq!(restored.access_token(), Some(access));
        prop_assert_eq!(restored.refresh_token(), refresh);
    }

    /// Parsing a callback built from a pair yields that pair.
    #[test]
    fn callback_round_trips_any_token(
        access in "\\PC{1,30}",
        refresh in "\\PC{1,30}",
    ) {
        let url = url::Url::parse_with_params(
            "http://localhost:8888/callback",
            &[("token", access.as_str()), ("refresh", refresh.as_str())],
        )
        .unwrap();

        let parsed = parse_callback(url.as_str()).unwrap();
        prop_assert_eq!(
            parsed,
            Callback::Authorized { access, refresh: Some(refresh) }
        );
    }

    /// Clearing twice is the same as clearing once.
    #[test]
    fn clear_is_idempotent(
        access in credential(),
        refresh in credential(),
        ids in prop::collection::vec("[a-z0-9]{1,8}", 0..6),
    ) {
        let session = SessionState::new();
        session.set_credential_pair(access, refresh);
        session.set_all_playlists(ids.iter().cloned().map(playlist).collect());
        for id in &ids {
            session.select_playlist(playlist(id.clone()));
        }

        session.clear();
        let once = (session.credentials(), session.all_playlists(), session.selected_playlists());
        session.clear();
        let twice = (session.credentials(), session.all_playlists(), session.selected_playlists());

        prop_assert!(!session.is_authenticated());
        prop_assert!(once.1.is_empty());
        prop_assert!(once.2.is_empty());
        prop_assert!(once == twice);
    }

    /// The selection never holds the same id twice.
    #[test]
    fn selection_has_no_duplicates(
        picks in prop::collection::vec("[a-c]", 0..20),
    ) {
        let session = SessionState::new();
        for id in &picks {
            session.select_playlist(playlist(id.clone()));
        }

        let mut selected: Vec<String> =
            session.selected_playlists().into_iter().map(|p| p.id).collect();
        let count = selected.len();
        selected.sort();
        selected.dedup();
        prop_assert_eq!(selected.len(), count);

        let mut distinct = picks.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(count, distinct.len());
    }

    /// The artist threshold never drops below its minimum.
    #[test]
    fn artist_threshold_is_clamped(value in any::<u32>()) {
        let session = SessionState::new();
        session.update_generator_settings(SettingsPatch {
            artist_min_appearances: Some(value),
            ..Default::default()
        });

        let applied = session.generator_settings().artist_min_appearances;
        prop_assert!(applied >= MIN_ARTIST_APPEARANCES);
        prop_assert_eq!(applied, value.max(MIN_ARTIST_APPEARANCES));
    }

    /// Review starts with everything selected and the create request
    /// follows the selection.
    #[test]
    fn review_create_request_matches_selection(
        results in results(),
        toggles in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut review = ReviewSet::from_results(&results);
        prop_assert_eq!(review.len(), results.len());
        prop_assert_eq!(review.selected_count(), review.len());

        if !review.is_empty() {
            for t in &toggles {
                review.toggle(t.index(review.len()));
            }
        }

        let request = review.to_create_request();
        prop_assert_eq!(request.playlists.len(), review.selected_count());
        for (draft, entry) in request.playlists.iter().zip(review.selected()) {
            prop_assert_eq!(&draft.name, &entry.name);
            prop_assert_eq!(&draft.track_ids, &entry.track_ids);
        }
    }
}
