use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{Error, Result};
use crate::page::{OrderWay, Page, PageQuery};

use super::{Entity, FieldValue};

/// In-memory keyed store and the producing side of [`Page`]: it runs the
/// lookup, counts the matches, applies the requested ordering, slices out one
/// page and fills in the metadata. Rows live in a BTreeMap so unordered reads
/// come back in id order. Share it across services with an `Arc`.
pub struct Store<T> {
    rows: RwLock<BTreeMap<u64, T>>,
    seq: AtomicU64,
}

fn order_rows<T: Entity>(rows: &mut [T], field: &str, way: OrderWay) {
    // Stable sort, so rows that tie on the field keep their id order.
    rows.sort_by(|a, b| {
        let ord = a.field(field).cmp(&b.field(field));
        match way {
            OrderWay::Asc => ord,
            OrderWay::Desc => ord.reverse(),
        }
    });
}

impl<T: Entity> Store<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            seq: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, T>> {
        self.rows.read().unwrap()
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, T>> {
        self.rows.write().unwrap()
    }

    fn check_field(field: &str) -> Result<()> {
        if T::FIELDS.contains(&field) {
            Ok(())
        } else {
            Err(Error::UnknownField {
                entity: T::NAME,
                field: field.to_owned(),
            })
        }
    }

    /// Inserts a new row. An entity without an id gets the next one from the
    /// sequence; an entity that brings its own id keeps it, and colliding
    /// with a live row is an error.
    pub fn save(&self, mut entity: T) -> Result<T> {
        let mut rows = self.write();
        let id = match entity.id() {
            Some(id) => {
                if rows.contains_key(&id) {
                    return Err(Error::IdConflict {
                        entity: T::NAME,
                        id,
                    });
                }
                self.seq.fetch_max(id, Ordering::Relaxed);
                id
            }
            None => self.seq.fetch_add(1, Ordering::Relaxed) + 1,
        };
        entity.set_id(id);
        rows.insert(id, entity.clone());
        debug!(entity = T::NAME, id, "saved");
        Ok(entity)
    }

    /// Replaces an existing row; a row that was never saved, or whose id is
    /// gone, is an error.
    pub fn update(&self, entity: T) -> Result<T> {
        let id = entity.id().ok_or(Error::MissingId { entity: T::NAME })?;
        let mut rows = self.write();
        if !rows.contains_key(&id) {
            return Err(Error::NotFound {
                entity: T::NAME,
                id,
            });
        }
        rows.insert(id, entity.clone());
        debug!(entity = T::NAME, id, "updated");
        Ok(entity)
    }

    /// Saves when the entity has no id yet, otherwise writes it under its id
    /// whether or not a row is already there.
    pub fn save_or_update(&self, entity: T) -> Result<T> {
        match entity.id() {
            None => self.save(entity),
            Some(id) => {
                self.seq.fetch_max(id, Ordering::Relaxed);
                self.write().insert(id, entity.clone());
                debug!(entity = T::NAME, id, "upserted");
                Ok(entity)
            }
        }
    }

    pub fn delete(&self, entity: &T) -> Result<()> {
        let id = entity.id().ok_or(Error::MissingId { entity: T::NAME })?;
        self.delete_by_id(id)
    }

    pub fn delete_by_id(&self, id: u64) -> Result<()> {
        match self.write().remove(&id) {
            Some(_) => {
                debug!(entity = T::NAME, id, "deleted");
                Ok(())
            }
            None => Err(Error::NotFound {
                entity: T::NAME,
                id,
            }),
        }
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.read().get(&id).cloned()
    }

    /// Like [`Store::get`], but a missing row is an error.
    pub fn load(&self, id: u64) -> Result<T> {
        self.get(id).ok_or(Error::NotFound {
            entity: T::NAME,
            id,
        })
    }

    /// Rows for the given ids; ids with no row are silently skipped.
    pub fn find_by_ids(&self, ids: &[u64]) -> Vec<T> {
        let rows = self.read();
        ids.iter().filter_map(|id| rows.get(id).cloned()).collect()
    }

    pub fn find_all(&self) -> Vec<T> {
        self.read().values().cloned().collect()
    }

    pub fn find_all_ordered(&self, field: &str, way: OrderWay) -> Result<Vec<T>> {
        Self::check_field(field)?;
        let mut rows = self.find_all();
        order_rows(&mut rows, field, way);
        Ok(rows)
    }

    /// Rows whose named field equals the given value.
    pub fn find_by(&self, field: &str, value: impl Into<FieldValue>) -> Result<Vec<T>> {
        Self::check_field(field)?;
        let value = value.into();
        Ok(self
            .read()
            .values()
            .filter(|row| row.field(field).as_ref() == Some(&value))
            .cloned()
            .collect())
    }

    /// The single row whose named field equals the value; more than one match
    /// is an error, no match is None.
    pub fn find_unique_by(
        &self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Option<T>> {
        let mut matches = self.find_by(field, value)?;
        if matches.len() > 1 {
            return Err(Error::NonUniqueResult {
                entity: T::NAME,
                field: field.to_owned(),
            });
        }
        Ok(matches.pop())
    }

    pub fn find_where<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read()
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    /// Removes every row the predicate matches and reports how many went.
    pub fn delete_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut rows = self.write();
        let before = rows.len();
        rows.retain(|_, row| !pred(row));
        let removed = before - rows.len();
        if removed > 0 {
            debug!(entity = T::NAME, removed, "bulk delete");
        }
        removed
    }

    pub fn count(&self) -> i64 {
        self.read().len() as i64
    }

    pub fn count_where<F>(&self, pred: F) -> i64
    where
        F: Fn(&T) -> bool,
    {
        self.read().values().filter(|row| pred(row)).count() as i64
    }

    /// Whether `new_value` would be unique for the field. A missing new value
    /// is vacuously unique, as is one equal to the value the row already had.
    pub fn is_field_unique(
        &self,
        field: &str,
        new_value: Option<FieldValue>,
        old_value: Option<FieldValue>,
    ) -> Result<bool> {
        let Some(new_value) = new_value else {
            return Ok(true);
        };
        if old_value.as_ref() == Some(&new_value) {
            return Ok(true);
        }
        Ok(self.find_unique_by(field, new_value)?.is_none())
    }

    pub fn find_page(&self, query: &PageQuery) -> Result<Page<T>> {
        self.find_page_where(query, |_| true)
    }

    /// Executes a paged lookup over the rows the predicate keeps: count them
    /// all, order when the query asks for it, slice out the requested page.
    /// The returned page never holds more than `page_size` rows, and an
    /// out-of-range page number comes back empty with intact metadata.
    pub fn find_page_where<F>(&self, query: &PageQuery, pred: F) -> Result<Page<T>>
    where
        F: Fn(&T) -> bool,
    {
        if query.page_size <= 0 {
            return Err(Error::InvalidPageSize {
                page_size: query.page_size,
            });
        }
        let order = query.order()?;
        if let Some((field, _)) = order {
            Self::check_field(field)?;
        }
        let mut matches = self.find_where(pred);
        if let Some((field, way)) = order {
            order_rows(&mut matches, field, way);
        }
        let row_count = matches.len() as i64;
        let items: Vec<T> = matches
            .into_iter()
            .skip(query.offset())
            .take(query.page_size as usize)
            .collect();
        debug!(
            entity = T::NAME,
            page = query.page_now,
            rows = row_count,
            returned = items.len(),
            "page built"
        );
        Ok(Page::for_query(query, row_count, items))
    }
}

impl<T: Entity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
