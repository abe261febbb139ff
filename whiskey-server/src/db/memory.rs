//! In-memory [`WhiskeyRepository`] for service and router tests

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use shared::models::{Whiskey, WhiskeyCategory, WhiskeyDraft};
use shared::page::{PageRequest, SortDirection, SortField};

use super::{RepoError, RepoResult, WhiskeyFilter, WhiskeyRepository};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: Vec<Whiskey>,
    fail_writes: bool,
}

#[derive(Default)]
pub struct MemoryWhiskeyRepository {
    inner: Mutex<Inner>,
}

impl MemoryWhiskeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error
    pub fn fail_writes(&self) {
        self.inner.lock().unwrap().fail_writes = true;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

fn matches(filter: &WhiskeyFilter, w: &Whiskey) -> bool {
    if let Some(category) = filter.category()
        && w.category != category
    {
        return false;
    }
    if let Some(search) = filter.search() {
        let needle = search.to_lowercase();
        return w.name.to_lowercase().contains(&needle)
            || w.brand.to_lowercase().contains(&needle);
    }
    true
}

/// NULLs sort after every value, as PostgreSQL does for ASC
fn cmp_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Whiskey, b: &Whiskey, field: SortField) -> Ordering {
    let primary = match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Brand => a.brand.cmp(&b.brand),
        SortField::StarPoint => a.star_point.total_cmp(&b.star_point),
        SortField::Abv => cmp_optional(a.abv, b.abv),
        SortField::Volume => cmp_optional(a.volume, b.volume),
        SortField::Id => Ordering::Equal,
    };
    primary.then(a.id.cmp(&b.id))
}

fn build(id: i64, draft: &WhiskeyDraft, created_at: i64, updated_at: i64) -> Whiskey {
    Whiskey {
        id,
        name: draft.name.clone(),
        english_name: draft.english_name.clone(),
        brand: draft.brand.clone(),
        category: draft.category,
        sub_categories: draft.sub_categories.clone(),
        abv: draft.abv,
        volume: draft.volume,
        nation: draft.nation.clone(),
        region: draft.region.clone(),
        image_data_url: draft.image_data_url.clone(),
        notes: draft.notes.clone(),
        nose: draft.nose.clone(),
        palate: draft.palate.clone(),
        finish: draft.finish.clone(),
        personal_note: draft.personal_note.clone(),
        star_point: draft.star_point,
        pairings: draft.pairings.clone(),
        flavor_tags: draft.flavor_tags.clone(),
        created_at,
        updated_at,
    }
}

fn check_writable(inner: &Inner) -> RepoResult<()> {
    if inner.fail_writes {
        return Err(RepoError::Database("simulated write failure".into()));
    }
    Ok(())
}

#[async_trait]
impl WhiskeyRepository for MemoryWhiskeyRepository {
    async fn find_page(
        &self,
        filter: &WhiskeyFilter,
        page: &PageRequest,
    ) -> RepoResult<(Vec<Whiskey>, u64)> {
        let inner = self.inner.lock().unwrap();
        let mut hits: Vec<Whiskey> = inner
            .rows
            .iter()
            .filter(|w| matches(filter, w))
            .cloned()
            .collect();

        hits.sort_by(|a, b| {
            let ord = compare(a, b, page.sort.field);
            match page.sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = hits.len() as u64;
        let items = hits
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Whiskey>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|w| w.id == id).cloned())
    }

    async fn insert(&self, draft: &WhiskeyDraft) -> RepoResult<Whiskey> {
        let mut inner = self.inner.lock().unwrap();
        check_writable(&inner)?;

        inner.next_id += 1;
        let now = shared::util::now_millis();
        let whiskey = build(inner.next_id, draft, now, now);
        inner.rows.push(whiskey.clone());
        Ok(whiskey)
    }

    async fn update(&self, id: i64, draft: &WhiskeyDraft) -> RepoResult<Option<Whiskey>> {
        let mut inner = self.inner.lock().unwrap();
        check_writable(&inner)?;

        let Some(slot) = inner.rows.iter_mut().find(|w| w.id == id) else {
            return Ok(None);
        };
        *slot = build(id, draft, slot.created_at, shared::util::now_millis());
        Ok(Some(slot.clone()))
    }

    async fn set_image(&self, id: i64, image_data_url: Option<&str>) -> RepoResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        check_writable(&inner)?;

        let Some(slot) = inner.rows.iter_mut().find(|w| w.id == id) else {
            return Ok(false);
        };
        slot.image_data_url = image_data_url.map(str::to_string);
        slot.updated_at = shared::util::now_millis();
        Ok(true)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        check_writable(&inner)?;

        let before = inner.rows.len();
        inner.rows.retain(|w| w.id != id);
        Ok(inner.rows.len() < before)
    }

    async fn count_by_category(&self) -> RepoResult<Vec<(WhiskeyCategory, u64)>> {
        let inner = self.inner.lock().unwrap();
        Ok(WhiskeyCategory::ALL
            .into_iter()
            .filter_map(|c| {
                let n = inner.rows.iter().filter(|w| w.category == c).count() as u64;
                (n > 0).then_some((c, n))
            })
            .collect())
    }
}
