#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tabli::db::courses::Courses;
    use tabli::db::db::Db;
    use tabli::db::exercises::Exercises;
    use tabli::libs::auto_backup::{AutoBackup, BackupJob, DEFAULT_DELAY};
    use tabli::libs::course::NewCourse;
    use tabli::libs::exercise::{Category, Difficulty, ExercisePatch, NewExercise};
    use tabli::libs::stores::search_store::RECENT_SEARCHES_LIMIT;
    use tabli::libs::stores::{CourseStore, ExerciseStore, FilterStore, SearchStore};
    use test_context::{test_context, AsyncTestContext, TestContext};

    struct StoreTestContext {
        db: Db,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            StoreTestContext {
                db: Db::in_memory().unwrap(),
            }
        }
    }

    struct ScheduledStoreTestContext {
        db: Db,
        runs: Arc<AtomicUsize>,
        auto_backup: Arc<AutoBackup>,
    }

    impl AsyncTestContext for ScheduledStoreTestContext {
        async fn setup() -> Self {
            let runs = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&runs);
            let job: BackupJob = Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            ScheduledStoreTestContext {
                db: Db::in_memory().unwrap(),
                runs,
                auto_backup: Arc::new(AutoBackup::new(DEFAULT_DELAY, job)),
            }
        }
    }

    fn mirror() -> NewExercise {
        NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group).with_tags(&["pairs"])
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_exercise_store_notifies_and_caches(ctx: &mut StoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |state| sink.borrow_mut().push(state.exercises.len()));

        // immediate call with the empty state
        assert_eq!(*seen.borrow(), vec![0]);

        let created = store.create(mirror()).unwrap();
        let id = created.id.clone().unwrap();
        assert_eq!(store.state().exercises.len(), 1);

        store
            .update(&id, ExercisePatch { title: Some("Mirror pairs".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(store.state().exercises[0].title, "Mirror pairs");

        assert!(store.delete(&id).unwrap());
        assert!(store.state().exercises.is_empty());
        assert_eq!(*seen.borrow(), vec![0, 1, 1, 0]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_exercise_store_records_errors(ctx: &mut StoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, None);

        let err = store.update("999", ExercisePatch::default()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.state().error.as_deref(), Some(err.to_string().as_str()));
        assert!(!store.state().loading);

        store.clear_error();
        assert!(store.state().error.is_none());

        // a successful load also clears a previous error
        store.toggle_favorite("999").unwrap_err();
        store.load().unwrap();
        assert!(store.state().error.is_none());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_exercise_store_derived_views(ctx: &mut StoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, None);
        store.create(mirror()).unwrap();
        store
            .create(NewExercise::new("Breathing", 5, Difficulty::Beginner, Category::Warmup).with_tags(&["voice", "calm"]).favorite())
            .unwrap();
        let party = store
            .create(NewExercise::new("Emotional Party", 20, Difficulty::Advanced, Category::Group))
            .unwrap();

        store.mark_as_used(party.id.as_deref().unwrap()).unwrap();

        assert_eq!(store.favorites().len(), 1);
        assert_eq!(store.all_tags(), vec!["calm", "pairs", "voice"]);
        let grouped = store.by_category();
        assert_eq!(grouped[&Category::Group].len(), 2);
        assert!(!grouped.contains_key(&Category::Solo));

        let recent = store.recently_used();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].usage_count, 1);

        let stats = store.load_stats().unwrap();
        assert_eq!(stats.total_exercises, 3);
        assert_eq!(store.state().stats.as_ref(), Some(&stats));

        store.reset();
        assert!(store.state().exercises.is_empty());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_course_store_tracks_durations(ctx: &mut StoreTestContext) {
        let mut exercises = ExerciseStore::new(&ctx.db.conn, None);
        let a = exercises.create(mirror()).unwrap().id.unwrap();
        let b = exercises
            .create(NewExercise::new("Count", 15, Difficulty::Beginner, Category::Group))
            .unwrap()
            .id
            .unwrap();

        let mut courses = CourseStore::new(&ctx.db.conn, None);
        let id = courses.create(NewCourse::new("Monday")).unwrap().id.unwrap();

        courses.add_exercise(&id, &a).unwrap();
        courses.add_exercise(&id, &b).unwrap();
        assert_eq!(courses.state().courses[0].total_duration, 25);

        courses.remove_exercise(&id, &a).unwrap();
        assert_eq!(courses.state().courses[0].total_duration, 15);

        courses.toggle_favorite(&id).unwrap();
        assert_eq!(courses.favorites().len(), 1);

        assert!(courses.add_exercise("404", &a).is_err());
        assert!(courses.state().error.is_some());

        courses.load().unwrap();
        assert_eq!(courses.state().courses.len(), 1);
        assert!(courses.delete(&id).unwrap());
        assert!(courses.state().courses.is_empty());
    }

    #[test_context(ScheduledStoreTestContext)]
    #[tokio::test(start_paused = true)]
    async fn test_mutations_schedule_auto_backup(ctx: &mut ScheduledStoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, Some(Arc::clone(&ctx.auto_backup)));

        store.load().unwrap();
        assert!(!ctx.auto_backup.is_pending());

        let id = store.create(mirror()).unwrap().id.unwrap();
        store.toggle_favorite(&id).unwrap();
        store.mark_as_used(&id).unwrap();
        assert!(ctx.auto_backup.is_pending());

        tokio::time::sleep(DEFAULT_DELAY * 2).await;
        assert_eq!(ctx.runs.load(Ordering::SeqCst), 1);

        let mut courses = CourseStore::new(&ctx.db.conn, Some(Arc::clone(&ctx.auto_backup)));
        courses.create(NewCourse::new("Monday")).unwrap();
        assert!(ctx.auto_backup.flush());
        assert_eq!(ctx.runs.load(Ordering::SeqCst), 2);
    }

    #[test_context(ScheduledStoreTestContext)]
    #[tokio::test(start_paused = true)]
    async fn test_import_schedules_auto_backup(ctx: &mut ScheduledStoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, Some(Arc::clone(&ctx.auto_backup)));
        store.create(mirror()).unwrap();
        let exported = store.export().unwrap();
        ctx.auto_backup.cancel();

        assert_eq!(store.import(exported).unwrap(), 1);
        assert_eq!(store.state().exercises.len(), 1);
        assert!(ctx.auto_backup.is_pending());
    }

    #[test]
    fn test_filter_store_activity() {
        let mut filters = FilterStore::new();
        assert!(!filters.is_active());
        assert_eq!(filters.active_filter_count(), 0);

        filters.set_difficulty(Some(Difficulty::Intermediate));
        filters.toggle_tag("voice");
        filters.set_duration_range(Some(5), Some(20));
        assert!(filters.is_active());
        assert_eq!(filters.active_filter_count(), 3);

        filters.toggle_tag("voice");
        assert_eq!(filters.active_filter_count(), 2);

        let filter = filters.active_filters();
        assert_eq!(filter.difficulty, Some(Difficulty::Intermediate));
        assert!(filter.tags.is_empty());
        assert_eq!(filter.is_favorite, None);

        filters.clear();
        assert!(!filters.is_active());
        assert_eq!(filters.active_filters().duration, None);
    }

    #[test]
    fn test_search_store_recent_searches() {
        let mut search = SearchStore::new();
        search.add_recent_search("mirror");
        search.add_recent_search("voice");
        search.add_recent_search("mirror");
        search.add_recent_search("   ");
        assert_eq!(search.state().recent_searches, vec!["mirror", "voice"]);

        for i in 0..15 {
            search.add_recent_search(&format!("query {}", i));
        }
        assert_eq!(search.state().recent_searches.len(), RECENT_SEARCHES_LIMIT);
        assert_eq!(search.state().recent_searches[0], "query 14");

        search.clear();
        assert_eq!(search.state().recent_searches.len(), RECENT_SEARCHES_LIMIT);
        search.clear_recent_searches();
        assert!(search.state().recent_searches.is_empty());
    }

    #[test]
    fn test_search_store_suggestions() {
        let mut search = SearchStore::new();
        search.set_suggestions(
            ["Mirror", "Mirror pairs", "Shadow mirror", "MIRROR walk", "mirrors", "mirror six", "Voice"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert!(search.filtered_suggestions().is_empty());

        search.set_query("mIrRoR");
        assert!(search.is_searching());
        assert!(search.state().is_active);
        let suggestions = search.filtered_suggestions();
        assert_eq!(suggestions.len(), 5);
        assert!(!suggestions.contains(&"Voice"));

        search.set_query("");
        assert!(!search.is_searching());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_exercise_cache_follows_equivalent_ids(ctx: &mut StoreTestContext) {
        let mut store = ExerciseStore::new(&ctx.db.conn, None);
        let id = store.create(mirror()).unwrap().id.unwrap();
        let padded = format!(" 0{}", id);

        store
            .update(&padded, ExercisePatch { duration: Some(25), ..Default::default() })
            .unwrap();
        assert_eq!(store.state().exercises[0].duration, 25);

        store.toggle_favorite(&padded).unwrap();
        assert!(store.state().exercises[0].is_favorite);

        store.mark_as_used(&padded).unwrap();
        assert_eq!(store.state().exercises[0].usage_count, 1);

        assert!(store.delete(&format!("0{}", id)).unwrap());
        assert!(store.state().exercises.is_empty());
        assert_eq!(Exercises::new(&ctx.db.conn).count().unwrap(), 0);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_course_cache_follows_equivalent_ids(ctx: &mut StoreTestContext) {
        let mut exercises = ExerciseStore::new(&ctx.db.conn, None);
        let exercise = exercises.create(mirror()).unwrap().id.unwrap();

        let mut courses = CourseStore::new(&ctx.db.conn, None);
        let id = courses.create(NewCourse::new("Monday")).unwrap().id.unwrap();
        let padded = format!("0{}", id);

        courses.add_exercise(&padded, &exercise).unwrap();
        assert_eq!(courses.state().courses[0].total_duration, 10);

        courses.toggle_favorite(&padded).unwrap();
        assert!(courses.state().courses[0].is_favorite);

        assert!(courses.delete(&padded).unwrap());
        assert!(courses.state().courses.is_empty());
        assert_eq!(Courses::new(&ctx.db.conn).count().unwrap(), 0);
    }
}
