// storefront/src/store/memory.rs

use super::Store;
use crate::errors::{AppError, Result};
use crate::models::{Comment, Course, CourseList, ListKind, Order, Session, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Process-local store. One lock per collection; guards never outlive a call.
#[derive(Default)]
pub struct MemoryStore {
  users: RwLock<HashMap<Uuid, User>>,
  sessions: RwLock<HashMap<String, Session>>,
  courses: RwLock<HashMap<Uuid, Course>>,
  carts: RwLock<HashMap<Uuid, CourseList>>,
  favorites: RwLock<HashMap<Uuid, CourseList>>,
  orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lists(&self, kind: ListKind) -> &RwLock<HashMap<Uuid, CourseList>> {
    match kind {
      ListKind::Cart => &self.carts,
      ListKind::Favorites => &self.favorites,
    }
  }
}

fn sorted_by_title(mut courses: Vec<Course>) -> Vec<Course> {
  courses.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
  courses
}

#[async_trait]
impl Store for MemoryStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    let mut users = self.users.write();
    if users.values().any(|u| u.username == user.username) {
      return Err(AppError::Validation("Username is already taken.".to_string()));
    }
    users.insert(user.id, user.clone());
    Ok(())
  }

  async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
    Ok(self.users.read().get(&user_id).cloned())
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(self.users.read().values().find(|u| u.username == username).cloned())
  }

  async fn insert_session(&self, session: &Session) -> Result<()> {
    self.sessions.write().insert(session.token.clone(), session.clone());
    Ok(())
  }

  async fn find_session(&self, token: &str) -> Result<Option<Session>> {
    Ok(self.sessions.read().get(token).cloned())
  }

  async fn delete_session(&self, token: &str) -> Result<bool> {
    Ok(self.sessions.write().remove(token).is_some())
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let courses = self.courses.read().values().cloned().collect();
    Ok(sorted_by_title(courses))
  }

  async fn search_courses(&self, term: &str, category: Option<&str>) -> Result<Vec<Course>> {
    let courses = self
      .courses
      .read()
      .values()
      .filter(|c| c.matches(term, category))
      .cloned()
      .collect();
    Ok(sorted_by_title(courses))
  }

  async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>> {
    Ok(self.courses.read().get(&course_id).cloned())
  }

  async fn find_courses(&self, course_ids: &[Uuid]) -> Result<Vec<Course>> {
    let courses = self.courses.read();
    let mut found: Vec<Course> = Vec::new();
    for id in course_ids {
      if found.iter().any(|c| c.id == *id) {
        continue;
      }
      if let Some(course) = courses.get(id) {
        found.push(course.clone());
      }
    }
    Ok(found)
  }

  async fn insert_course(&self, course: &Course) -> Result<()> {
    self.courses.write().insert(course.id, course.clone());
    Ok(())
  }

  async fn update_course(&self, course: &Course) -> Result<bool> {
    let mut courses = self.courses.write();
    match courses.get_mut(&course.id) {
      Some(existing) => {
        // Comments are only ever appended through `push_comment`.
        let comments = std::mem::take(&mut existing.comments);
        *existing = Course {
          comments,
          ..course.clone()
        };
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn push_comment(&self, course_id: Uuid, comment: &Comment) -> Result<bool> {
    match self.courses.write().get_mut(&course_id) {
      Some(course) => {
        course.comments.push(comment.clone());
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete_course(&self, course_id: Uuid) -> Result<bool> {
    Ok(self.courses.write().remove(&course_id).is_some())
  }

  async fn find_list(&self, kind: ListKind, user_id: Uuid) -> Result<Option<CourseList>> {
    Ok(self.lists(kind).read().get(&user_id).cloned())
  }

  async fn save_list(&self, list: &CourseList) -> Result<()> {
    self.lists(list.kind).write().insert(list.user_id, list.clone());
    Ok(())
  }

  async fn delete_list(&self, kind: ListKind, user_id: Uuid) -> Result<bool> {
    Ok(self.lists(kind).write().remove(&user_id).is_some())
  }

  async fn insert_order(&self, order: &Order) -> Result<()> {
    self.orders.write().insert(order.id, order.clone());
    Ok(())
  }

  async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>> {
    Ok(self.orders.read().get(&order_id).cloned())
  }

  async fn list_orders(&self, user_id: Option<Uuid>) -> Result<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .orders
      .read()
      .values()
      .filter(|o| user_id.map_or(true, |uid| o.user_id == uid))
      .cloned()
      .collect();
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(orders)
  }

  async fn order_ids_with_course(&self, course_id: Uuid) -> Result<Vec<Uuid>> {
    let orders = self.list_orders(None).await?;
    Ok(
      orders
        .into_iter()
        .filter(|o| o.contains_course(course_id))
        .map(|o| o.id)
        .collect(),
    )
  }

  async fn update_order(&self, order: &Order) -> Result<bool> {
    match self.orders.write().get_mut(&order.id) {
      Some(existing) => {
        *existing = order.clone();
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete_order(&self, order_id: Uuid) -> Result<bool> {
    Ok(self.orders.write().remove(&order_id).is_some())
  }
}
