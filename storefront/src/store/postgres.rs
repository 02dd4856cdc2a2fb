// storefront/src/store/postgres.rs

use super::Store;
use crate::errors::{AppError, Result};
use crate::models::{Comment, Course, CourseList, CourseSnapshot, ListKind, Order, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{event, instrument, Level};
use uuid::Uuid;

const COURSE_COLUMNS: &str = "id, title, price_cents, img, description, category, comments, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, lines, total_price_cents, delivery_point, created_at";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

#[derive(FromRow)]
struct CourseListRow {
  id: Uuid,
  user_id: Uuid,
  #[sqlx(json)]
  courses: Vec<CourseSnapshot>,
  updated_at: DateTime<Utc>,
}

impl CourseListRow {
  fn into_list(self, kind: ListKind) -> CourseList {
    CourseList {
      id: self.id,
      user_id: self.user_id,
      kind,
      courses: self.courses,
      updated_at: self.updated_at,
    }
  }
}

impl PgStore {
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPool::connect(database_url).await.map_err(|e| {
      event!(Level::ERROR, error = %e, "Failed to connect to the database.");
      AppError::Sqlx(e)
    })?;
    Ok(Self { pool })
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
      event!(Level::ERROR, error = %e, "Database migration failed.");
      AppError::Sqlx(e.into())
    })?;
    event!(Level::INFO, "Database migrations applied.");
    Ok(())
  }
}

/// Escapes LIKE metacharacters so the term is matched literally.
fn like_pattern(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len() + 2);
  escaped.push('%');
  for ch in term.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped.push('%');
  escaped
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "PgStore::insert_user", skip(self, user), fields(username = %user.username))]
  async fn insert_user(&self, user: &User) -> Result<()> {
    let outcome = sqlx::query("INSERT INTO users (id, username, password_hash, role, created_at) VALUES ($1, $2, $3, $4, $5)")
      .bind(user.id)
      .bind(&user.username)
      .bind(&user.password_hash)
      .bind(user.role)
      .bind(user.created_at)
      .execute(&self.pool)
      .await;

    match outcome {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(AppError::Validation("Username is already taken.".to_string()))
      }
      Err(e) => Err(AppError::Sqlx(e)),
    }
  }

  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, created_at FROM users WHERE id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let user =
      sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
    Ok(user)
  }

  async fn insert_session(&self, session: &Session) -> Result<()> {
    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
      .bind(&session.token)
      .bind(session.user_id)
      .bind(session.created_at)
      .bind(session.expires_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn find_session(&self, token: &str) -> Result<Option<Session>> {
    let session =
      sqlx::query_as::<_, Session>("SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1")
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
    Ok(session)
  }

  async fn delete_session(&self, token: &str) -> Result<bool> {
    let done = sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let courses = sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses ORDER BY title, id", COURSE_COLUMNS))
      .fetch_all(&self.pool)
      .await?;
    Ok(courses)
  }

  #[instrument(name = "PgStore::search_courses", skip(self))]
  async fn search_courses(&self, term: &str, category: Option<&str>) -> Result<Vec<Course>> {
    let sql = format!(
      "SELECT {} FROM courses \
       WHERE (title ILIKE $1 ESCAPE '\\' OR description ILIKE $1 ESCAPE '\\') \
       AND ($2::text IS NULL OR category = $2) \
       ORDER BY title, id",
      COURSE_COLUMNS
    );
    let courses = sqlx::query_as::<_, Course>(&sql)
      .bind(like_pattern(term))
      .bind(category)
      .fetch_all(&self.pool)
      .await?;
    Ok(courses)
  }

  async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS))
      .bind(course_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(course)
  }

  async fn find_courses(&self, course_ids: &[Uuid]) -> Result<Vec<Course>> {
    if course_ids.is_empty() {
      return Ok(Vec::new());
    }
    let courses = sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = ANY($1)", COURSE_COLUMNS))
      .bind(course_ids)
      .fetch_all(&self.pool)
      .await?;
    Ok(courses)
  }

  async fn insert_course(&self, course: &Course) -> Result<()> {
    sqlx::query(
      "INSERT INTO courses (id, title, price_cents, img, description, category, comments, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(course.id)
    .bind(&course.title)
    .bind(course.price_cents)
    .bind(&course.img)
    .bind(&course.description)
    .bind(&course.category)
    .bind(Json(&course.comments))
    .bind(course.created_at)
    .bind(course.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn update_course(&self, course: &Course) -> Result<bool> {
    let done = sqlx::query(
      "UPDATE courses SET title = $2, price_cents = $3, img = $4, description = $5, category = $6, updated_at = $7 \
       WHERE id = $1",
    )
    .bind(course.id)
    .bind(&course.title)
    .bind(course.price_cents)
    .bind(&course.img)
    .bind(&course.description)
    .bind(&course.category)
    .bind(course.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn push_comment(&self, course_id: Uuid, comment: &Comment) -> Result<bool> {
    let done = sqlx::query("UPDATE courses SET comments = comments || $2::jsonb WHERE id = $1")
      .bind(course_id)
      .bind(Json([comment]))
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn delete_course(&self, course_id: Uuid) -> Result<bool> {
    let done = sqlx::query("DELETE FROM courses WHERE id = $1")
      .bind(course_id)
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn find_list(&self, kind: ListKind, user_id: Uuid) -> Result<Option<CourseList>> {
    let sql = format!("SELECT id, user_id, courses, updated_at FROM {} WHERE user_id = $1", kind.table());
    let row = sqlx::query_as::<_, CourseListRow>(&sql)
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(|r| r.into_list(kind)))
  }

  #[instrument(name = "PgStore::save_list", skip(self, list), fields(kind = %list.kind, user_id = %list.user_id))]
  async fn save_list(&self, list: &CourseList) -> Result<()> {
    let sql = format!(
      "INSERT INTO {} (id, user_id, courses, updated_at) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (user_id) DO UPDATE SET courses = EXCLUDED.courses, updated_at = EXCLUDED.updated_at",
      list.kind.table()
    );
    sqlx::query(&sql)
      .bind(list.id)
      .bind(list.user_id)
      .bind(Json(&list.courses))
      .bind(list.updated_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete_list(&self, kind: ListKind, user_id: Uuid) -> Result<bool> {
    let done = sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", kind.table()))
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn insert_order(&self, order: &Order) -> Result<()> {
    sqlx::query(
      "INSERT INTO orders (id, user_id, lines, total_price_cents, delivery_point, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(Json(&order.lines))
    .bind(order.total_price_cents)
    .bind(&order.delivery_point)
    .bind(order.created_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(order)
  }

  async fn list_orders(&self, user_id: Option<Uuid>) -> Result<Vec<Order>> {
    let sql = format!(
      "SELECT {} FROM orders WHERE ($1::uuid IS NULL OR user_id = $1) ORDER BY created_at, id",
      ORDER_COLUMNS
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  async fn order_ids_with_course(&self, course_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM orders WHERE lines @> $1 ORDER BY created_at, id")
      .bind(Json(json!([{ "courseId": course_id }])))
      .fetch_all(&self.pool)
      .await?;
    Ok(ids)
  }

  async fn update_order(&self, order: &Order) -> Result<bool> {
    let done = sqlx::query("UPDATE orders SET lines = $2, total_price_cents = $3 WHERE id = $1")
      .bind(order.id)
      .bind(Json(&order.lines))
      .bind(order.total_price_cents)
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }

  async fn delete_order(&self, order_id: Uuid) -> Result<bool> {
    let done = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&self.pool)
      .await?;
    Ok(done.rows_affected() > 0)
  }
}
