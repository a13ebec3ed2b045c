use pyformat_sqlite::prelude::*;

const TEST_SQL: &str = "
CREATE TABLE users (id INTEGER, name TEXT);
INSERT INTO users VALUES (1, 'foo'), (2, 'bar');
";

fn load_test_data() -> Result<Connection, CompatDbError> {
    let conn = connect(":memory:")?;
    conn.executescript(TEST_SQL)?;
    conn.commit()?;
    Ok(conn)
}

// Written the way calling code uses the emulated client.
fn get_user_id(conn: &Connection, user: &str) -> Result<Option<i64>, CompatDbError> {
    conn.with_cursor(|cur| {
        cur.execute("SELECT id FROM users WHERE name=%s", (user,))?;
        Ok(cur.fetchone()?.and_then(|row| row[0].as_int()))
    })
}

#[test]
fn select_returns_sentinel_and_rows_are_fetchable() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();

    let count = cur.execute("SELECT id, name FROM users WHERE name=%s", ("foo",))?;
    assert_eq!(count, -1);
    assert_eq!(
        cur.fetchone()?,
        Some(Row(vec![SqlValue::Integer(1), SqlValue::Text("foo".into())]))
    );

    assert_eq!(cur.execute("SELECT id, name FROM users WHERE name=%s", ("bar",))?, -1);
    assert_eq!(
        cur.fetchone()?.map(Row::into_values),
        Some(vec![SqlValue::Integer(2), SqlValue::Text("bar".into())])
    );

    assert_eq!(cur.execute("SELECT id, name FROM users WHERE name=%s", ("nonexist",))?, -1);
    assert_eq!(cur.fetchone()?, None);
    Ok(())
}

#[test]
fn select_sentinel_ignores_match_count() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    assert_eq!(cur.execute("SELECT * FROM users", ())?, -1);
    assert_eq!(cur.fetchall()?.len(), 2);
    Ok(())
}

#[test]
fn lookup_helper_through_scoped_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    assert_eq!(get_user_id(&conn, "foo")?, Some(1));
    assert_eq!(get_user_id(&conn, "bar")?, Some(2));
    assert_eq!(get_user_id(&conn, "nonexist")?, None);
    assert_eq!(conn.open_cursors(), 0);
    Ok(())
}

#[test]
fn mutating_statements_report_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();

    assert_eq!(cur.execute("INSERT INTO users VALUES (%s, %s)", (3, "baz"))?, 1);
    assert_eq!(cur.lastrowid(), Some(3));
    assert_eq!(
        cur.execute("UPDATE users SET name = %(name)s WHERE id > %(id)s", Params::named([
            ("name", SqlValue::from("renamed")),
            ("id", SqlValue::from(1)),
        ]))?,
        2
    );
    assert_eq!(cur.execute("DELETE FROM users WHERE id = %s", (42,))?, 0);
    assert_eq!(cur.execute("DELETE FROM users", ())?, 3);
    Ok(())
}

#[test]
fn lowercase_select_is_not_special_cased() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    // the prefix check is case-sensitive; the engine's own count for a query is -1
    assert_eq!(cur.execute("select id from users", ())?, -1);
    assert_eq!(cur.fetchall()?.len(), 2);
    Ok(())
}

#[test]
fn executemany_sums_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    let rows = vec![(10, "a"), (11, "b"), (12, "c")];
    assert_eq!(cur.executemany("INSERT INTO users VALUES (%s, %s)", rows)?, 3);

    let named = vec![
        Params::named([("id", 10)]),
        Params::named([("id", 11)]),
        Params::named([("id", 99)]),
    ];
    assert_eq!(cur.executemany("DELETE FROM users WHERE id = %(id)s", named)?, 2);
    assert_eq!(
        cur.last_statement(),
        Some("DELETE FROM users WHERE id = :id")
    );
    Ok(())
}

#[test]
fn executemany_rejects_queries() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    let err = cur
        .executemany("SELECT * FROM users WHERE id = %s", vec![(1,), (2,)])
        .unwrap_err();
    assert!(matches!(err, CompatDbError::ProgrammingError(_)));
    Ok(())
}

#[test]
fn fetchmany_uses_arraysize() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    cur.execute("INSERT INTO users VALUES (%s, %s)", (3, "baz"))?;
    cur.execute("SELECT id FROM users ORDER BY id", ())?;
    assert_eq!(cur.fetchmany(None)?.len(), 1);
    cur.set_arraysize(5);
    assert_eq!(cur.fetchmany(None)?.len(), 2);
    assert!(cur.fetchmany(Some(10))?.is_empty());
    let names: Vec<&str> = cur
        .description()
        .unwrap_or_default()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["id"]);
    Ok(())
}

#[test]
fn last_statement_holds_translated_sql() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    assert_eq!(cur.last_statement(), None);
    cur.execute("SELECT id FROM users WHERE name=%s", ("foo",))?;
    assert_eq!(cur.last_statement(), Some("SELECT id FROM users WHERE name=?"));
    Ok(())
}

#[test]
fn engine_errors_pass_through() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();

    let err = cur.execute("SELEC id FROM users", ()).unwrap_err();
    assert!(matches!(err, CompatDbError::SqliteError(_)));

    let err = cur.execute("INSERT INTO users VALUES (%s, %s)", (1,)).unwrap_err();
    assert!(matches!(
        err,
        CompatDbError::SqliteError(rusqlite::Error::InvalidParameterCount(1, 2))
    ));

    let err = cur
        .execute("SELECT * FROM users WHERE id = %(id)s", Params::named([("other", 1)]))
        .unwrap_err();
    assert!(matches!(
        err,
        CompatDbError::SqliteError(rusqlite::Error::InvalidParameterName(_))
    ));
    Ok(())
}

#[test]
fn scoped_cursor_closes_when_body_fails() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let result: Result<i64, CompatDbError> = conn.with_cursor(|cur| {
        cur.execute("SELECT * FROM users", ())?;
        cur.execute("SELECT * FROM missing_table", ())
    });
    assert!(matches!(result, Err(CompatDbError::SqliteError(_))));
    assert_eq!(conn.open_cursors(), 0);
    Ok(())
}

#[test]
fn scoped_cursor_closes_when_body_panics() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = conn.with_cursor(|cur| -> Result<(), CompatDbError> {
            cur.execute("SELECT * FROM users", ())?;
            panic!("body blew up");
        });
    }));
    assert!(outcome.is_err());
    assert_eq!(conn.open_cursors(), 0);
    Ok(())
}

#[test]
fn closed_cursor_refuses_work() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut cur = conn.cursor();
    assert_eq!(conn.open_cursors(), 1);
    cur.close();
    cur.close();
    assert!(cur.is_closed());
    assert_eq!(conn.open_cursors(), 0);
    assert!(matches!(
        cur.fetchone(),
        Err(CompatDbError::ProgrammingError(_))
    ));
    assert!(matches!(
        cur.execute("SELECT 1", ()),
        Err(CompatDbError::ProgrammingError(_))
    ));
    Ok(())
}

#[test]
fn cursors_are_independent() -> Result<(), Box<dyn std::error::Error>> {
    let conn = load_test_data()?;
    let mut first = conn.cursor();
    let mut second = conn.cursor();
    first.execute("SELECT name FROM users WHERE id=%s", (1,))?;
    second.execute("SELECT name FROM users WHERE id=%s", (2,))?;
    assert_eq!(first.fetchone()?.unwrap()[0], SqlValue::Text("foo".into()));
    assert_eq!(second.fetchone()?.unwrap()[0], SqlValue::Text("bar".into()));
    Ok(())
}
