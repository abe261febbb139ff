//! Whiskey database operations (PostgreSQL)
//!
//! Scalars live in `whiskeys`; sub-categories, flavor tags and pairings live
//! in child tables keyed by `(whiskey_id, position)`. Writes replace all
//! child rows inside the same transaction as the parent row.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Pairing, Whiskey, WhiskeyCategory, WhiskeyDraft, WhiskeySubCategory};
use shared::page::{PageRequest, SortField};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::{RepoError, RepoResult, WhiskeyFilter, WhiskeyRepository, like_pattern};

const SELECT_COLUMNS: &str = "id, name, english_name, brand, category, abv, volume, nation, \
     region, image_data_url, notes, nose, palate, finish, personal_note, star_point, \
     created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
struct WhiskeyRow {
    id: i64,
    name: String,
    english_name: Option<String>,
    brand: String,
    category: String,
    abv: Option<f64>,
    volume: Option<f64>,
    nation: Option<String>,
    region: Option<String>,
    image_data_url: Option<String>,
    notes: Option<String>,
    nose: Option<String>,
    palate: Option<String>,
    finish: Option<String>,
    personal_note: Option<String>,
    star_point: f64,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PairingRow {
    whiskey_id: i64,
    icon: String,
    name: String,
}

/// Child collections of one item, collected before assembly
#[derive(Default)]
struct Children {
    sub_categories: Vec<WhiskeySubCategory>,
    flavor_tags: Vec<String>,
    pairings: Vec<Pairing>,
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Name => "name",
        SortField::Brand => "brand",
        SortField::StarPoint => "star_point",
        SortField::Abv => "abv",
        SortField::Volume => "volume",
        SortField::Id => "id",
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &WhiskeyFilter) {
    if let Some(category) = filter.category() {
        qb.push(" WHERE category = ").push_bind(category.as_str());
    }
    if let Some(search) = filter.search() {
        qb.push(if filter.category().is_some() {
            " AND "
        } else {
            " WHERE "
        });
        let pattern = like_pattern(search);
        qb.push("(name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR brand ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
}

fn assemble(row: WhiskeyRow, children: Children) -> RepoResult<Whiskey> {
    let category: WhiskeyCategory = row
        .category
        .parse()
        .map_err(|_| RepoError::InvalidData(format!("whiskey {}: category {}", row.id, row.category)))?;

    Ok(Whiskey {
        id: row.id,
        name: row.name,
        english_name: row.english_name,
        brand: row.brand,
        category,
        sub_categories: children.sub_categories,
        abv: row.abv,
        volume: row.volume,
        nation: row.nation,
        region: row.region,
        image_data_url: row.image_data_url,
        notes: row.notes,
        nose: row.nose,
        palate: row.palate,
        finish: row.finish,
        personal_note: row.personal_note,
        star_point: row.star_point,
        pairings: children.pairings,
        flavor_tags: children.flavor_tags,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn from_draft(id: i64, draft: &WhiskeyDraft, created_at: i64, updated_at: i64) -> Whiskey {
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

/// Load child rows for `rows` with one query per child table and assemble
async fn hydrate(conn: &mut PgConnection, rows: Vec<WhiskeyRow>) -> RepoResult<Vec<Whiskey>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let mut children: HashMap<i64, Children> = HashMap::new();

    let sub_rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT whiskey_id, sub_category FROM whiskey_sub_categories \
         WHERE whiskey_id = ANY($1) ORDER BY whiskey_id, position",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for (whiskey_id, raw) in sub_rows {
        let sub: WhiskeySubCategory = raw
            .parse()
            .map_err(|_| RepoError::InvalidData(format!("whiskey {whiskey_id}: sub-category {raw}")))?;
        children.entry(whiskey_id).or_default().sub_categories.push(sub);
    }

    let tag_rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT whiskey_id, flavor_tag FROM whiskey_flavor_tags \
         WHERE whiskey_id = ANY($1) ORDER BY whiskey_id, position",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for (whiskey_id, tag) in tag_rows {
        children.entry(whiskey_id).or_default().flavor_tags.push(tag);
    }

    let pairing_rows: Vec<PairingRow> = sqlx::query_as(
        "SELECT whiskey_id, icon, name FROM whiskey_pairings \
         WHERE whiskey_id = ANY($1) ORDER BY whiskey_id, position",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for p in pairing_rows {
        children.entry(p.whiskey_id).or_default().pairings.push(Pairing {
            icon: p.icon,
            name: p.name,
        });
    }

    rows.into_iter()
        .map(|row| {
            let c = children.remove(&row.id).unwrap_or_default();
            assemble(row, c)
        })
        .collect()
}

/// Replace all child rows of `whiskey_id`
async fn write_children(
    conn: &mut PgConnection,
    whiskey_id: i64,
    draft: &WhiskeyDraft,
) -> RepoResult<()> {
    for table in ["whiskey_sub_categories", "whiskey_flavor_tags", "whiskey_pairings"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE whiskey_id = $1"))
            .bind(whiskey_id)
            .execute(&mut *conn)
            .await?;
    }

    if !draft.sub_categories.is_empty() {
        let positions: Vec<i32> = (0..draft.sub_categories.len() as i32).collect();
        let values: Vec<&str> = draft.sub_categories.iter().map(|s| s.as_str()).collect();
        sqlx::query(
            r#"
            INSERT INTO whiskey_sub_categories (whiskey_id, position, sub_category)
            SELECT $1, t.position, t.sub_category
            FROM UNNEST($2::integer[], $3::text[]) AS t(position, sub_category)
            "#,
        )
        .bind(whiskey_id)
        .bind(&positions)
        .bind(&values)
        .execute(&mut *conn)
        .await?;
    }

    if !draft.flavor_tags.is_empty() {
        let positions: Vec<i32> = (0..draft.flavor_tags.len() as i32).collect();
        sqlx::query(
            r#"
            INSERT INTO whiskey_flavor_tags (whiskey_id, position, flavor_tag)
            SELECT $1, t.position, t.flavor_tag
            FROM UNNEST($2::integer[], $3::text[]) AS t(position, flavor_tag)
            "#,
        )
        .bind(whiskey_id)
        .bind(&positions)
        .bind(&draft.flavor_tags)
        .execute(&mut *conn)
        .await?;
    }

    if !draft.pairings.is_empty() {
        let positions: Vec<i32> = (0..draft.pairings.len() as i32).collect();
        let icons: Vec<&str> = draft.pairings.iter().map(|p| p.icon.as_str()).collect();
        let names: Vec<&str> = draft.pairings.iter().map(|p| p.name.as_str()).collect();
        sqlx::query(
            r#"
            INSERT INTO whiskey_pairings (whiskey_id, position, icon, name)
            SELECT $1, t.position, t.icon, t.name
            FROM UNNEST($2::integer[], $3::text[], $4::text[]) AS t(position, icon, name)
            "#,
        )
        .bind(whiskey_id)
        .bind(&positions)
        .bind(&icons)
        .bind(&names)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// PostgreSQL-backed [`WhiskeyRepository`]
#[derive(Clone)]
pub struct PgWhiskeyRepository {
    pool: PgPool,
}

impl PgWhiskeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WhiskeyRepository for PgWhiskeyRepository {
    async fn find_page(
        &self,
        filter: &WhiskeyFilter,
        page: &PageRequest,
    ) -> RepoResult<(Vec<Whiskey>, u64)> {
        let mut conn = self.pool.acquire().await?;

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM whiskeys");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;

        let direction = page.sort.direction.as_sql();
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {SELECT_COLUMNS} FROM whiskeys"));
        push_filter(&mut qb, filter);
        qb.push(format!(
            " ORDER BY {} {direction}, id {direction} LIMIT ",
            sort_column(page.sort.field)
        ))
        .push_bind(i64::from(page.size))
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);

        let rows = qb.build_query_as::<WhiskeyRow>().fetch_all(&mut *conn).await?;
        let items = hydrate(&mut conn, rows).await?;

        Ok((items, total.max(0) as u64))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Whiskey>> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<WhiskeyRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM whiskeys WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn insert(&self, draft: &WhiskeyDraft) -> RepoResult<Whiskey> {
        let now = shared::util::now_millis();
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO whiskeys (
                name, english_name, brand, category, abv, volume, nation, region,
                image_data_url, notes, nose, palate, finish, personal_note,
                star_point, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.english_name)
        .bind(&draft.brand)
        .bind(draft.category.as_str())
        .bind(draft.abv)
        .bind(draft.volume)
        .bind(&draft.nation)
        .bind(&draft.region)
        .bind(&draft.image_data_url)
        .bind(&draft.notes)
        .bind(&draft.nose)
        .bind(&draft.palate)
        .bind(&draft.finish)
        .bind(&draft.personal_note)
        .bind(draft.star_point)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        write_children(&mut tx, id, draft).await?;
        tx.commit().await?;

        Ok(from_draft(id, draft, now, now))
    }

    async fn update(&self, id: i64, draft: &WhiskeyDraft) -> RepoResult<Option<Whiskey>> {
        let now = shared::util::now_millis();
        let mut tx = self.pool.begin().await?;

        let created_at: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE whiskeys SET
                name = $2, english_name = $3, brand = $4, category = $5,
                abv = $6, volume = $7, nation = $8, region = $9,
                image_data_url = $10, notes = $11, nose = $12, palate = $13,
                finish = $14, personal_note = $15, star_point = $16,
                updated_at = $17
            WHERE id = $1
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.english_name)
        .bind(&draft.brand)
        .bind(draft.category.as_str())
        .bind(draft.abv)
        .bind(draft.volume)
        .bind(&draft.nation)
        .bind(&draft.region)
        .bind(&draft.image_data_url)
        .bind(&draft.notes)
        .bind(&draft.nose)
        .bind(&draft.palate)
        .bind(&draft.finish)
        .bind(&draft.personal_note)
        .bind(draft.star_point)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((created_at,)) = created_at else {
            return Ok(None);
        };

        write_children(&mut tx, id, draft).await?;
        tx.commit().await?;

        Ok(Some(from_draft(id, draft, created_at, now)))
    }

    async fn set_image(&self, id: i64, image_data_url: Option<&str>) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE whiskeys SET image_data_url = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(image_data_url)
                .bind(shared::util::now_millis())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        // Child rows go with ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM whiskeys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_category(&self) -> RepoResult<Vec<(WhiskeyCategory, u64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM whiskeys GROUP BY category")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(raw, count)| {
                let category: WhiskeyCategory = raw
                    .parse()
                    .map_err(|_| RepoError::InvalidData(format!("category {raw}")))?;
                Ok((category, count.max(0) as u64))
            })
            .collect()
    }
}
