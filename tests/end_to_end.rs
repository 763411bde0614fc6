//! Whole-program scenarios run against the public `Database` API.

use minisql_engine::{Database, Value};

fn must_succeed(db: &mut Database, text: &str) {
    let result = db.execute(text);
    assert!(result.is_ok(), "`{text}` failed: {:?}", result.error_message());
}

#[test]
fn auto_increment_assigns_from_zero_and_advances() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE users (id INT AUTOINCREMENT KEY, name VARCHAR)");
    must_succeed(&mut db, "INSERT INTO users VALUES (, \"ada\")");
    must_succeed(&mut db, "INSERT INTO users VALUES (, \"grace\")");

    let result = db.execute("SELECT * FROM users");
    assert!(result.is_ok());
    let rows = result.payload();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some(&Value::Int(0)));
    assert_eq!(rows[1].get("id"), Some(&Value::Int(1)));
}

#[test]
fn explicit_auto_increment_value_advances_the_counter() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (id INT AUTOINCREMENT KEY)");
    must_succeed(&mut db, "INSERT INTO t VALUES (100)");
    must_succeed(&mut db, "INSERT INTO t VALUES ()");

    let result = db.execute("SELECT * FROM t");
    assert_eq!(result.payload()[1].get("id"), Some(&Value::Int(101)));
}

#[test]
fn auto_increment_regression_is_rejected() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (id INT AUTOINCREMENT KEY)");
    must_succeed(&mut db, "INSERT INTO t VALUES (50)");

    let result = db.execute("INSERT INTO t VALUES (10)");
    assert!(!result.is_ok());
    assert!(result.error_message().unwrap().contains("regression"));
}

#[test]
fn unique_violation_is_rejected_and_leaves_table_unchanged() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (email VARCHAR UNIQUE)");
    must_succeed(&mut db, "INSERT INTO t VALUES (\"a@example.com\")");

    let result = db.execute("INSERT INTO t VALUES (\"a@example.com\")");
    assert!(!result.is_ok());
    assert_eq!(db.execute("SELECT * FROM t").payload().len(), 1);
}

#[test]
fn update_with_arithmetic_expression_and_where_filter() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE accounts (id INT AUTOINCREMENT KEY, balance INT)");
    must_succeed(&mut db, "INSERT INTO accounts VALUES (, 100)");
    must_succeed(&mut db, "INSERT INTO accounts VALUES (, 200)");

    must_succeed(&mut db, "UPDATE accounts SET balance = balance + 50 WHERE balance == 100");

    let result = db.execute("SELECT balance FROM accounts WHERE id == 0");
    assert_eq!(result.payload()[0].get("balance"), Some(&Value::Int(150)));
    let untouched = db.execute("SELECT balance FROM accounts WHERE id == 1");
    assert_eq!(untouched.payload()[0].get("balance"), Some(&Value::Int(200)));
}

#[test]
fn two_table_join_matches_on_foreign_key() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE authors (id INT AUTOINCREMENT KEY, name VARCHAR)");
    must_succeed(&mut db, "CREATE TABLE books (id INT AUTOINCREMENT KEY, author_id INT, title VARCHAR)");
    must_succeed(&mut db, "INSERT INTO authors VALUES (, \"Tolkien\")");
    must_succeed(&mut db, "INSERT INTO books VALUES (, 0, \"The Hobbit\")");
    must_succeed(&mut db, "INSERT INTO books VALUES (, 0, \"LOTR\")");

    let result = db.execute(
        "SELECT authors.name, books.title FROM authors JOIN books ON authors.id == books.author_id",
    );
    assert!(result.is_ok());
    let rows = result.payload();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.get("authors.name"), Some(&Value::Str("Tolkien".to_string())));
    }
}

#[test]
fn create_index_succeeds_on_known_column_and_fails_on_unknown() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (x INT, y INT)");
    must_succeed(&mut db, "CREATE UNORDERED INDEX ON t BY x");

    let result = db.execute("CREATE ORDERED INDEX ON t BY z");
    assert!(!result.is_ok());
    assert!(result.error_message().unwrap().contains("unknown column"));
}

#[test]
fn delete_removes_only_matching_rows() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (id INT AUTOINCREMENT KEY, score INT)");
    must_succeed(&mut db, "INSERT INTO t VALUES (, 10)");
    must_succeed(&mut db, "INSERT INTO t VALUES (, 90)");

    must_succeed(&mut db, "DELETE FROM t WHERE score < 50");
    let result = db.execute("SELECT * FROM t");
    assert_eq!(result.payload().len(), 1);
    assert_eq!(result.payload()[0].get("score"), Some(&Value::Int(90)));
}

#[test]
fn named_insert_fills_default_and_errors_on_unknown_column() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (id INT AUTOINCREMENT KEY, rank INT DEFAULT 1, label VARCHAR)");
    must_succeed(&mut db, "INSERT INTO t (label) VALUES (\"x\")");
    let result = db.execute("SELECT rank FROM t");
    assert_eq!(result.payload()[0].get("rank"), Some(&Value::Int(1)));

    let mut db2 = Database::new();
    must_succeed(&mut db2, "CREATE TABLE t (required VARCHAR)");
    let missing = db2.execute("INSERT INTO t (nonexistent) VALUES (\"x\")");
    assert!(!missing.is_ok());
}

#[test]
fn named_insert_fills_unassigned_non_default_column_with_typed_zero() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (required VARCHAR, extra INT)");
    must_succeed(&mut db, "INSERT INTO t (extra) VALUES (1)");
    let result = db.execute("SELECT required FROM t");
    assert_eq!(result.payload()[0].get("required"), Some(&Value::Str(String::new())));
}

#[test]
fn type_mismatch_on_insert_is_reported() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (flag BOOL)");
    let result = db.execute("INSERT INTO t VALUES (5)");
    assert!(!result.is_ok());
    assert!(result.error_message().unwrap().contains("mismatch"));
}

#[test]
fn syntax_errors_never_panic_and_are_reported_via_exec_result() {
    let mut db = Database::new();
    let result = db.execute("SELEC * FROM t");
    assert!(!result.is_ok());
    assert!(result.error_message().is_some());
}

#[test]
fn semicolon_terminated_statements_with_where_and_on_clauses_parse() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (id INT AUTOINCREMENT KEY, score INT);");
    must_succeed(&mut db, "INSERT INTO t VALUES (, 10);");
    must_succeed(&mut db, "INSERT INTO t VALUES (, 90);");
    must_succeed(&mut db, "UPDATE t SET score = score + 1 WHERE score < 50;");
    let result = db.execute("SELECT * FROM t WHERE score == 11;");
    assert!(result.is_ok(), "{:?}", result.error_message());
    assert_eq!(result.payload().len(), 1);
    must_succeed(&mut db, "DELETE FROM t WHERE score == 90;");
    assert_eq!(db.execute("SELECT * FROM t;").payload().len(), 1);
}

#[test]
fn salary_raise_above_threshold_matches_spec_scenario() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE Emp (ID INT, Salary DOUBLE)");
    must_succeed(&mut db, "INSERT INTO Emp VALUES (1, 100.0)");
    must_succeed(&mut db, "INSERT INTO Emp VALUES (2, 200.0)");
    must_succeed(&mut db, "INSERT INTO Emp VALUES (3, 300.0)");

    must_succeed(&mut db, "UPDATE Emp SET Salary = Salary + 50.0 WHERE Salary > 150.0");

    let result = db.execute("SELECT Salary FROM Emp");
    assert!(result.is_ok());
    let salaries: Vec<Value> = result.payload().iter().map(|r| r.get("Salary").unwrap().clone()).collect();
    assert_eq!(salaries, vec![Value::Double(100.0), Value::Double(250.0), Value::Double(350.0)]);
}

#[test]
fn boolean_literals_are_usable_directly_in_predicates() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (active BOOL, label VARCHAR)");
    must_succeed(&mut db, "INSERT INTO t VALUES (true, \"a\")");
    must_succeed(&mut db, "INSERT INTO t VALUES (false, \"b\")");

    let result = db.execute("SELECT label FROM t WHERE active == true || false");
    assert!(result.is_ok(), "{:?}", result.error_message());
    assert_eq!(result.payload().len(), 1);
    assert_eq!(result.payload()[0].get("label"), Some(&Value::Str("a".to_string())));
}

#[test]
fn xor_is_true_only_when_exactly_one_side_holds() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE t (a BOOL, b BOOL, label VARCHAR)");
    must_succeed(&mut db, "INSERT INTO t VALUES (true, false, \"mismatch\")");
    must_succeed(&mut db, "INSERT INTO t VALUES (true, true, \"match\")");

    let result = db.execute("SELECT label FROM t WHERE a ^^ b");
    assert!(result.is_ok(), "{:?}", result.error_message());
    assert_eq!(result.payload().len(), 1);
    assert_eq!(result.payload()[0].get("label"), Some(&Value::Str("mismatch".to_string())));
}

#[test]
fn explicit_null_literal_in_positional_insert_uses_default() {
    let mut db = Database::new();
    must_succeed(&mut db, "CREATE TABLE Users (ID INT AUTOINCREMENT KEY, Name VARCHAR)");
    must_succeed(&mut db, "INSERT INTO Users VALUES (NULL, \"Ada\")");
    must_succeed(&mut db, "INSERT INTO Users VALUES (NULL, \"Babbage\")");

    let result = db.execute("SELECT * FROM Users");
    assert!(result.is_ok());
    let rows = result.payload();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("ID"), Some(&Value::Int(0)));
    assert_eq!(rows[0].get("Name"), Some(&Value::Str("Ada".to_string())));
    assert_eq!(rows[1].get("ID"), Some(&Value::Int(1)));
    assert_eq!(rows[1].get("Name"), Some(&Value::Str("Babbage".to_string())));
}
