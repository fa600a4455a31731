#[cfg(test)]
mod tests {
    use tabli::db::db::Db;
    use tabli::db::exercises::Exercises;
    use tabli::libs::exercise::{Category, Difficulty, NewExercise};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StatsTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for StatsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("tabli.db")).unwrap();
            StatsTestContext { _temp_dir: temp_dir, db }
        }
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_stats_on_empty_catalog(ctx: &mut StatsTestContext) {
        let stats = Exercises::new(&ctx.db.conn).stats().unwrap();
        assert_eq!(stats.total_exercises, 0);
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(stats.favorite_count, 0);
        assert!(stats.most_used_tags.is_empty());
        assert!(stats.recently_used.is_empty());
        assert_eq!(stats.exercises_by_difficulty[&Difficulty::Advanced], 0);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_stats_aggregates(ctx: &mut StatsTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        exercises
            .create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group).with_tags(&["pairs", "focus"]))
            .unwrap();
        exercises
            .create(NewExercise::new("Tongue twisters", 5, Difficulty::Intermediate, Category::VoiceAndDiction).with_tags(&["voice"]).favorite())
            .unwrap();
        let party = exercises
            .create(NewExercise::new("Emotional Party", 30, Difficulty::Advanced, Category::Improvisation).with_tags(&["focus"]))
            .unwrap();
        exercises.mark_as_used(party.id.as_deref().unwrap()).unwrap();

        let stats = exercises.stats().unwrap();
        assert_eq!(stats.total_exercises, 3);
        assert_eq!(stats.average_duration, 15.0);
        assert_eq!(stats.favorite_count, 1);
        assert_eq!(stats.exercises_by_difficulty[&Difficulty::Beginner], 1);
        assert_eq!(stats.exercises_by_category[&Category::Warmup], 0);
        assert_eq!(stats.exercises_by_category[&Category::Improvisation], 1);

        assert_eq!(stats.most_used_tags[0].tag, "focus");
        assert_eq!(stats.most_used_tags[0].count, 2);
        assert_eq!(stats.most_used_tags.len(), 3);

        assert_eq!(stats.recently_used.len(), 1);
        assert_eq!(stats.recently_used[0].title, "Emotional Party");
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_top_tags_limited_to_ten(ctx: &mut StatsTestContext) {
        let exercises = Exercises::new(&ctx.db.conn);
        let tags: Vec<String> = (0..12).map(|i| format!("tag{}", i)).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        exercises
            .create(NewExercise::new("Everything", 10, Difficulty::Beginner, Category::Solo).with_tags(&tag_refs))
            .unwrap();

        let stats = exercises.stats().unwrap();
        assert_eq!(stats.most_used_tags.len(), 10);
        // ties keep first-seen order
        assert_eq!(stats.most_used_tags[0].tag, "tag0");
        assert_eq!(stats.most_used_tags[9].tag, "tag9");
    }
}
