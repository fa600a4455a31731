#[cfg(test)]
mod tests {
    use tabli::db::db::Db;
    use tabli::db::exercises::Exercises;
    use tabli::libs::error::CatalogError;
    use tabli::libs::exercise::{Category, Difficulty, DurationRange, ExerciseFilter, ExercisePatch, NewExercise};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExerciseTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for ExerciseTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("tabli.db")).unwrap();
            ExerciseTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn seed(exercises: &Exercises) {
        exercises
            .create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group).with_tags(&["pairs", "focus"]))
            .unwrap();
        exercises
            .create(
                NewExercise::new("Zip Zap Boing", 5, Difficulty::Beginner, Category::Warmup)
                    .with_description("Fast energy circle")
                    .with_tags(&["energy"]),
            )
            .unwrap();
        exercises
            .create(NewExercise::new("Emotional Party", 20, Difficulty::Advanced, Category::Improvisation).with_tags(&["focus", "emotion"]).favorite())
            .unwrap();
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_exercise_crud(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);

        // Create
        let created = exercises
            .create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group))
            .unwrap();
        let id = created.id.clone().unwrap();
        assert_eq!(created.usage_count, 0);
        assert!(!created.is_favorite);
        assert!(created.last_used.is_none());
        assert_eq!(created.created_at, created.updated_at);

        // Read
        let fetched = exercises.get(&id).unwrap().unwrap();
        assert_eq!(fetched, created);

        // Update
        let patch = ExercisePatch {
            duration: Some(15),
            notes: Some(Some("Works well with teenagers".to_string())),
            ..Default::default()
        };
        let updated = exercises.update(&id, patch).unwrap();
        assert_eq!(updated.duration, 15);
        assert_eq!(updated.title, "Mirror");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(exercises.get(&id).unwrap().unwrap().notes.as_deref(), Some("Works well with teenagers"));

        // Delete
        assert!(exercises.delete(&id).unwrap());
        assert!(exercises.get(&id).unwrap().is_none());
        assert!(!exercises.delete(&id).unwrap());
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_ids_are_never_reused(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        let first = exercises.create(NewExercise::new("A", 5, Difficulty::Beginner, Category::Solo)).unwrap();
        exercises.delete(first.id.as_deref().unwrap()).unwrap();
        let second = exercises.create(NewExercise::new("B", 5, Difficulty::Beginner, Category::Solo)).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_missing_ids(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);

        assert!(exercises.get("999").unwrap().is_none());
        assert!(exercises.get("not-a-number").unwrap().is_none());

        let err = exercises.update("999", ExercisePatch::default()).unwrap_err();
        assert!(matches!(err, CatalogError::ExerciseNotFound(ref id) if id == "999"));
        assert!(matches!(exercises.toggle_favorite("abc").unwrap_err(), CatalogError::ExerciseNotFound(_)));

        // silently ignored
        exercises.mark_as_used("999").unwrap();
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_toggle_favorite_and_mark_as_used(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        let id = exercises
            .create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group))
            .unwrap()
            .id
            .unwrap();

        assert!(exercises.toggle_favorite(&id).unwrap().is_favorite);
        assert!(!exercises.toggle_favorite(&id).unwrap().is_favorite);

        exercises.mark_as_used(&id).unwrap();
        exercises.mark_as_used(&id).unwrap();
        let used = exercises.get(&id).unwrap().unwrap();
        assert_eq!(used.usage_count, 2);
        assert!(used.last_used.is_some());
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_search(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        seed(&exercises);

        let titles = |query: &str| -> Vec<String> { exercises.search(query).unwrap().into_iter().map(|e| e.title).collect() };

        assert_eq!(titles("MIRROR"), vec!["Mirror"]);
        assert_eq!(titles("energy"), vec!["Zip Zap Boing"]);
        assert_eq!(titles("  focus "), vec!["Mirror", "Emotional Party"]);
        assert_eq!(titles("   ").len(), 3);
        assert!(titles("nothing like this").is_empty());
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_filter(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        seed(&exercises);

        let by_difficulty = ExerciseFilter {
            difficulty: Some(Difficulty::Beginner),
            ..Default::default()
        };
        assert_eq!(exercises.filter(&by_difficulty).unwrap().len(), 2);

        let all_tags = ExerciseFilter {
            tags: vec!["focus".to_string(), "emotion".to_string()],
            ..Default::default()
        };
        let matched = exercises.filter(&all_tags).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Emotional Party");

        // bounds are inclusive
        let range = ExerciseFilter {
            duration: Some(DurationRange { min: Some(5), max: Some(10) }),
            ..Default::default()
        };
        assert_eq!(exercises.filter(&range).unwrap().len(), 2);

        // a missing bound leaves that side open
        let max_only = ExerciseFilter {
            duration: Some(DurationRange { min: None, max: Some(10) }),
            ..Default::default()
        };
        let short: Vec<String> = exercises.filter(&max_only).unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(short, vec!["Mirror", "Zip Zap Boing"]);

        let min_only = ExerciseFilter {
            duration: Some(DurationRange { min: Some(11), max: None }),
            ..Default::default()
        };
        assert_eq!(exercises.filter(&min_only).unwrap().len(), 1);

        let favorites = ExerciseFilter {
            is_favorite: Some(true),
            category: Some(Category::Improvisation),
            ..Default::default()
        };
        assert_eq!(exercises.filter(&favorites).unwrap().len(), 1);

        assert_eq!(exercises.filter(&ExerciseFilter::default()).unwrap().len(), 3);
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_all_tags_sorted_and_distinct(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        seed(&exercises);
        assert_eq!(exercises.all_tags().unwrap(), vec!["emotion", "energy", "focus", "pairs"]);
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_import_replaces_collection(ctx: &mut ExerciseTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        seed(&exercises);
        let exported = exercises.export().unwrap();
        let old_ids: Vec<String> = exported.iter().filter_map(|e| e.id.clone()).collect();

        let inserted = exercises.import(exported[..2].to_vec()).unwrap();
        assert_eq!(inserted, 2);

        let current = exercises.list().unwrap();
        assert_eq!(current.len(), 2);
        // fresh ids are assigned
        assert!(current.iter().all(|e| !old_ids.contains(e.id.as_ref().unwrap())));
        assert_eq!(current[0].title, "Mirror");
    }

    #[test_context(ExerciseTestContext)]
    #[test]
    fn test_records_survive_reopen(ctx: &mut ExerciseTestContext) {
        let path = ctx.db.path().unwrap().to_path_buf();
        Exercises::new(&ctx.db.conn)
            .create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group))
            .unwrap();

        let reopened = Db::open(&path).unwrap();
        let exercises = Exercises::new(&reopened.conn).list().unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].difficulty, Difficulty::Beginner);
    }
}
