//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_store::ModelStore;
    use crate::trend::TrendModel;
    use chrono::NaiveDate;

    fn new_tx(date: &str, amount: f64, hash: &str) -> NewTransaction {
        NewTransaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            description: Some(format!("tx {}", hash)),
            category: None,
            kind: Some(if amount < 0.0 {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            }),
            import_hash: hash.to_string(),
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.count_transactions().unwrap(), 0);
        assert!(db.list_goals().unwrap().is_empty());
        assert!(db.latest_trend_model().unwrap().is_none());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'date', 'amount', 'description', 'category', 'kind', 'import_hash', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 8, "transactions table should have 8 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('trend_models') WHERE name IN ('id', 'slope', 'intercept', 'observations', 'first_month', 'last_month', 'trained_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 7, "trend_models table should have 7 expected columns");
    }

    #[test]
    fn test_insert_transaction_dedup() {
        let db = Database::in_memory().unwrap();

        let first = db
            .insert_transaction(&new_tx("2024-01-15", 1200.0, "abc"))
            .unwrap();
        let TransactionInsertResult::Inserted(id) = first else {
            panic!("expected insert");
        };

        // Same hash is skipped and reports the existing row
        let second = db
            .insert_transaction(&new_tx("2024-01-15", 1200.0, "abc"))
            .unwrap();
        assert_eq!(second, TransactionInsertResult::Duplicate(id));
        assert!(second.is_duplicate());
        assert_eq!(db.count_transactions().unwrap(), 1);
    }

    #[test]
    fn test_list_and_get_transactions() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&new_tx("2024-01-15", 1200.0, "a"))
            .unwrap();
        db.insert_transaction(&new_tx("2024-02-03", -300.5, "b"))
            .unwrap();
        db.insert_transaction(&new_tx("2024-03-20", 800.0, "c"))
            .unwrap();

        let listed = db.list_transactions(2, 0).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].date.to_string(), "2024-03-20");
        assert_eq!(listed[1].amount, -300.5);
        assert_eq!(listed[1].kind, Some(TransactionKind::Expense));

        let page2 = db.list_transactions(2, 2).unwrap();
        assert_eq!(page2.len(), 1);

        let fetched = db.get_transaction(page2[0].id).unwrap().unwrap();
        assert_eq!(fetched.import_hash, "a");
        assert!(db.get_transaction(9999).unwrap().is_none());
    }

    #[test]
    fn test_raw_transactions_and_total() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.total_savings().unwrap(), 0.0);

        db.insert_transaction(&new_tx("2024-02-01", 500.0, "x"))
            .unwrap();
        db.insert_transaction(&new_tx("2024-01-01", 250.25, "y"))
            .unwrap();

        let raw = db.raw_transactions().unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0], RawTransaction::new("2024-01-01", 250.25));
        assert_eq!(db.total_savings().unwrap(), 750.25);
    }

    #[test]
    fn test_goal_crud() {
        let db = Database::in_memory().unwrap();

        let id = db
            .create_goal(&NewGoal {
                name: "Emergency fund".into(),
                target_amount: 10000.0,
                current_savings: 2500.0,
            })
            .unwrap();
        assert!(id > 0);

        let goal = db.get_goal(id).unwrap().unwrap();
        assert_eq!(goal.name, "Emergency fund");
        assert_eq!(goal.target_amount, 10000.0);

        db.update_goal_savings(id, 4000.0).unwrap();
        assert_eq!(db.get_goal(id).unwrap().unwrap().current_savings, 4000.0);
        assert_eq!(db.list_goals().unwrap().len(), 1);

        db.delete_goal(id).unwrap();
        assert!(db.get_goal(id).unwrap().is_none());
        assert!(matches!(db.delete_goal(id), Err(Error::NotFound(_))));
        assert!(matches!(
            db.update_goal_savings(id, 1.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_goal_validation() {
        let db = Database::in_memory().unwrap();
        let bad_target = NewGoal {
            name: "Car".into(),
            target_amount: 0.0,
            current_savings: 0.0,
        };
        assert!(matches!(
            db.create_goal(&bad_target),
            Err(Error::InvalidData(_))
        ));

        let blank = NewGoal {
            name: "  ".into(),
            target_amount: 100.0,
            current_savings: 0.0,
        };
        assert!(db.create_goal(&blank).is_err());
    }

    #[test]
    fn test_model_store_round_trip() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.load(), Err(Error::ModelNotFound(_))));

        let series = vec![
            MonthlyAggregate {
                month_index: MonthIndex::try_from(202401).unwrap(),
                total_amount: 1000.125,
            },
            MonthlyAggregate {
                month_index: MonthIndex::try_from(202402).unwrap(),
                total_amount: 1750.0 / 3.0,
            },
        ];
        let model = TrendModel::fit(&series).unwrap();
        db.save(&model).unwrap();

        let loaded = db.load().unwrap();
        assert_eq!(loaded.slope, model.slope);
        assert_eq!(loaded.intercept, model.intercept);
        assert_eq!(loaded.first_month, model.first_month);
        assert_eq!(loaded.observations, 2);
    }

    #[test]
    fn test_trend_model_history() {
        let db = Database::in_memory().unwrap();
        db.save(&TrendModel::new(1.0, 10.0)).unwrap();
        db.save(&TrendModel::new(2.0, 20.0)).unwrap();
        db.save(&TrendModel::new(3.0, 30.0)).unwrap();

        // Latest save is the active model
        assert_eq!(db.load().unwrap().slope, 3.0);

        let history = db.list_trend_models(10).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].model.slope, 3.0);
        assert_eq!(history[2].model.intercept, 10.0);
        assert_eq!(db.list_trend_models(1).unwrap().len(), 1);
    }

    #[test]
    fn test_encrypted_database_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("enc.db");
        let path = path.to_string_lossy();

        {
            let db = Database::new_with_key(&path, Some("correct horse")).unwrap();
            db.insert_transaction(&new_tx("2024-01-01", 10.0, "k"))
                .unwrap();
        }

        let reopened = Database::new_with_key(&path, Some("correct horse")).unwrap();
        assert_eq!(reopened.count_transactions().unwrap(), 1);

        assert!(Database::new_with_key(&path, Some("wrong")).is_err());
    }
}
