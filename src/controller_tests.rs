//! Tests for view state transitions, caching and stale responses

#[cfg(test)]
mod tests {
    use crate::cache::CacheStats;
    use crate::config::AppConfig;
    use crate::controller::*;
    use crate::error::FetchError;
    use crate::models::ShowId;
    use crate::screen::{Cards, Status};
    use crate::tasks::FetchContext;
    use crate::test_support::{episode, show, QueuedExecutor, RecordingSurface, ScriptedSource};
    use std::sync::mpsc::channel;
    use std::sync::Arc;

    struct Harness {
        controller: Controller<RecordingSurface>,
        source: Arc<ScriptedSource>,
        executor: QueuedExecutor,
    }

    impl Harness {
        fn new() -> Self {
            let source = ScriptedSource::new();
            let executor = QueuedExecutor::default();
            let (sender, receiver) = channel();
            let fetcher = FetchContext::new(source.clone(), Box::new(executor.clone()), sender);
            let controller =
                Controller::new(fetcher, receiver, AppConfig::default(), RecordingSurface::default());
            Self { controller, source, executor }
        }

        /// Started and settled on the shows list
        fn loaded() -> Self {
            let mut h = Self::new();
            h.source.set_shows(Ok(vec![show(3, "castle"), show(1, "Arrow"), show(2, "Bitten")]));
            h.source.set_episodes(
                ShowId(1),
                Ok(vec![
                    episode(101, 1, 1, "Pilot"),
                    episode(102, 1, 2, "Honor Thy Father"),
                    episode(103, 1, 3, "Lone Gunmen"),
                ]),
            );
            h.source.set_episodes(ShowId(2), Ok(vec![episode(201, 1, 1, "Summer of Love")]));
            h.controller.start();
            h.settle();
            h
        }

        fn settle(&mut self) {
            self.executor.run_all();
            self.controller.poll_tasks();
        }

        fn frames(&self) -> usize {
            self.controller.surface().frames.len()
        }

        fn last_status(&self) -> Status {
            self.controller.surface().last().status.clone()
        }
    }

    fn shown_names(cards: &Cards) -> Vec<String> {
        match cards {
            Cards::Shows(c) => c.iter().map(|s| s.name.clone()).collect(),
            Cards::Episodes(c) => c.iter().map(|e| e.title.clone()).collect(),
        }
    }

    #[test]
    fn test_start_paints_loading_then_sorted_shows() {
        let mut h = Harness::new();
        h.source.set_shows(Ok(vec![show(3, "castle"), show(1, "Arrow"), show(2, "Bitten")]));
        h.controller.start();

        assert_eq!(h.controller.view(), &ViewState::Loading(Intent::Shows));
        assert_eq!(h.last_status(), Status::Loading("Loading shows list...".to_string()));
        assert!(h.controller.is_loading());

        h.settle();

        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        let screen = h.controller.surface().last();
        assert_eq!(screen.status, Status::Ready);
        assert_eq!(screen.title, "TV Shows");
        assert_eq!(shown_names(&screen.cards), vec!["Arrow", "Bitten", "castle"]);
        assert_eq!(screen.count_label, "Displaying 3 / 3 shows");
        assert_eq!(h.frames(), 2);
    }

    #[test]
    fn test_shows_failure_then_retry() {
        let mut h = Harness::new();
        h.source.set_shows(Err(FetchError::Transport("connection refused".to_string())));
        h.controller.start();
        h.settle();

        assert_eq!(
            h.controller.view(),
            &ViewState::Error { message: SHOWS_ERROR.to_string(), failed: Intent::Shows }
        );
        assert!(h.controller.surface().last().retry);

        h.source.set_shows(Ok(vec![show(1, "Arrow")]));
        h.controller.handle_event(UiEvent::RetryRequested);
        assert_eq!(h.controller.view(), &ViewState::Loading(Intent::Shows));
        h.settle();

        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert_eq!(h.source.show_calls(), 2);
    }

    #[test]
    fn test_open_show_loads_episodes() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));

        assert_eq!(h.controller.view(), &ViewState::Loading(Intent::Episodes(ShowId(1))));
        let loading = h.controller.surface().last();
        assert_eq!(loading.status, Status::Loading("Loading episodes...".to_string()));
        assert_eq!(loading.title, "Episodes: Arrow");
        // No show cards linger while loading
        assert!(loading.cards.is_empty());

        h.settle();

        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(1)));
        let screen = h.controller.surface().last();
        assert_eq!(
            shown_names(&screen.cards),
            vec!["Pilot - S01E01", "Honor Thy Father - S01E02", "Lone Gunmen - S01E03"]
        );
        assert_eq!(screen.count_label, "Displaying 3 / 3 episodes");
        assert!(screen.back);
    }

    #[test]
    fn test_episode_failure_keeps_shows() {
        let mut h = Harness::loaded();
        h.source.set_episodes(ShowId(3), Err(FetchError::Status(500)));
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(3)));
        h.settle();

        assert_eq!(
            h.controller.view(),
            &ViewState::Error {
                message: EPISODES_ERROR.to_string(),
                failed: Intent::Episodes(ShowId(3)),
            }
        );
        assert!(h
            .controller
            .surface()
            .frames
            .iter()
            .all(|f| f.title != "Episodes: castle" || f.status != Status::Ready));

        h.controller.handle_event(UiEvent::BackRequested);
        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert_eq!(h.source.show_calls(), 1);
        assert_eq!(h.controller.surface().last().count_label, "Displaying 3 / 3 shows");
    }

    #[test]
    fn test_retry_failed_episodes() {
        let mut h = Harness::loaded();
        h.source.set_episodes(ShowId(3), Err(FetchError::Status(503)));
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(3)));
        h.settle();

        h.source.set_episodes(ShowId(3), Ok(vec![episode(301, 2, 4, "Knockdown")]));
        h.controller.handle_event(UiEvent::RetryRequested);
        h.settle();

        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(3)));
        assert_eq!(h.source.episode_calls(ShowId(3)), 2);
    }

    #[test]
    fn test_back_then_other_show_starts_clean() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.settle();
        h.controller.handle_event(UiEvent::QueryChanged("gun".to_string()));
        assert_eq!(h.controller.surface().last().count_label, "Displaying 1 / 3 episodes");

        h.controller.handle_event(UiEvent::BackRequested);
        assert_eq!(h.controller.browse().query(), "");
        h.controller.handle_event(UiEvent::SelectorChanged(Some(1)));
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(2)));
        h.settle();

        assert_eq!(h.controller.browse().query(), "");
        assert_eq!(h.controller.browse().selection(), None);
        let screen = h.controller.surface().last();
        assert_eq!(screen.title, "Episodes: Bitten");
        assert_eq!(screen.query, "");
        assert_eq!(screen.count_label, "Displaying 1 / 1 episodes");
    }

    #[test]
    fn test_back_to_shows_uses_cache() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.settle();
        h.controller.handle_event(UiEvent::BackRequested);

        // Loading is painted, then resolved from memory without a fetch
        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert_eq!(h.executor.pending(), 0);
        assert_eq!(h.source.show_calls(), 1);

        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(_)));
        assert_eq!(h.source.episode_calls(ShowId(1)), 1);
        assert_eq!(h.controller.cache_stats(), CacheStats { hits: 2, joins: 0, fetches: 2 });
    }

    #[test]
    fn test_late_response_does_not_repaint() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.controller.handle_event(UiEvent::BackRequested);
        assert_eq!(h.controller.view(), &ViewState::ShowsList);

        let painted = h.frames();
        h.settle();

        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert_eq!(h.frames(), painted);

        // The abandoned result was still memoized
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(_)));
        assert_eq!(h.source.episode_calls(ShowId(1)), 1);
    }

    #[test]
    fn test_out_of_order_completion_applies_only_current() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.controller.handle_event(UiEvent::BackRequested);
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(2)));
        assert_eq!(h.executor.pending(), 2);

        // Bitten finishes first, then the abandoned Arrow request
        h.executor.run_last();
        h.controller.poll_tasks();
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(2)));

        h.settle();
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(2)));
        assert_eq!(h.controller.surface().last().title, "Episodes: Bitten");
    }

    #[test]
    fn test_stale_failure_is_dropped() {
        let mut h = Harness::loaded();
        h.source.set_episodes(ShowId(3), Err(FetchError::Status(500)));
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(3)));
        h.controller.handle_event(UiEvent::BackRequested);
        h.settle();

        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert!(h
            .controller
            .surface()
            .frames
            .iter()
            .all(|f| !matches!(f.status, Status::Error(_))));
    }

    #[test]
    fn test_reopening_in_flight_show_joins_request() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.controller.handle_event(UiEvent::BackRequested);
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));

        assert_eq!(h.executor.pending(), 1);
        assert_eq!(h.controller.cache_stats().joins, 1);

        h.settle();
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(1)));
        assert_eq!(h.source.episode_calls(ShowId(1)), 1);
    }

    #[test]
    fn test_select_then_show_all() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::QueryChanged("b".to_string()));
        h.controller.handle_event(UiEvent::SelectorChanged(Some(2)));

        let screen = h.controller.surface().last();
        assert_eq!(screen.query, "");
        assert_eq!(shown_names(&screen.cards), vec!["castle"]);
        assert_eq!(screen.count_label, "Displaying 1 / 3 shows");
        assert!(screen.show_all);

        h.controller.handle_event(UiEvent::ShowAllRequested);
        let screen = h.controller.surface().last();
        assert_eq!(screen.cards.len(), 3);
        assert_eq!(screen.count_label, "Displaying 3 / 3 shows");
        assert!(!screen.show_all);
    }

    #[test]
    fn test_query_clears_selection() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::SelectorChanged(Some(0)));
        h.controller.handle_event(UiEvent::QueryChanged("drama".to_string()));

        assert_eq!(h.controller.browse().selection(), None);
        let screen = h.controller.surface().last();
        assert_eq!(screen.count_label, "Displaying 3 / 3 shows");
        assert_eq!(screen.dropdown.selected, None);

        h.controller.handle_event(UiEvent::QueryChanged("bit".to_string()));
        assert_eq!(shown_names(&h.controller.surface().last().cards), vec!["Bitten"]);
    }

    #[test]
    fn test_ignored_events() {
        let mut h = Harness::loaded();
        let painted = h.frames();

        h.controller.handle_event(UiEvent::ItemActivated(ShowId(99)));
        h.controller.handle_event(UiEvent::BackRequested);
        h.controller.handle_event(UiEvent::RetryRequested);
        h.controller.handle_event(UiEvent::ShowAllRequested);
        assert_eq!(h.controller.view(), &ViewState::ShowsList);
        assert_eq!(h.frames(), painted);

        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        h.settle();
        let painted = h.frames();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(2)));
        assert!(matches!(h.controller.view(), ViewState::EpisodesList(s) if s.id == ShowId(1)));
        assert_eq!(h.frames(), painted);
    }

    #[test]
    fn test_back_while_loading_episodes() {
        let mut h = Harness::loaded();
        h.controller.handle_event(UiEvent::ItemActivated(ShowId(2)));
        assert!(h.controller.surface().last().back);

        h.controller.handle_event(UiEvent::BackRequested);
        assert_eq!(h.controller.view(), &ViewState::ShowsList);
    }

    #[test]
    fn test_every_transition_paints() {
        let mut h = Harness::loaded();
        let before = h.frames();

        h.controller.handle_event(UiEvent::ItemActivated(ShowId(1)));
        assert_eq!(h.frames(), before + 1);
        h.settle();
        assert_eq!(h.frames(), before + 2);

        // Back goes through Loading(Shows) on its way to the cached list
        h.controller.handle_event(UiEvent::BackRequested);
        assert_eq!(h.frames(), before + 4);
        let frames = &h.controller.surface().frames;
        assert_eq!(
            frames[before + 2].status,
            Status::Loading("Loading shows list...".to_string())
        );
        assert!(frames[before + 2].cards.is_empty());
    }
}
