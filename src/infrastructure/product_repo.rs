use chrono::Utc;
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, PageResult, Product, ProductQuery};
use crate::schema::products;

use super::models::{NewProductRow, ProductRow};

diesel::define_sql_function!(fn lower(x: Text) -> Text);

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// The unique index on `(lower(name), lower(brand))` is the authoritative
/// duplicate check; map its violation back to the domain error.
fn write_error(e: DieselError, name: &str, brand: &str) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::duplicate(name, brand)
        }
        other => other.into(),
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn filtered(query: &ProductQuery) -> products::BoxedQuery<'static, Pg> {
    let mut q = products::table.into_boxed();

    if let Some(name) = query.name.as_deref().filter(|s| !s.is_empty()) {
        q = q.filter(products::name.ilike(contains_pattern(name)));
    }
    if let Some(brand) = query.brand.as_deref().filter(|s| !s.is_empty()) {
        q = q.filter(products::brand.ilike(contains_pattern(brand)));
    }
    if let Some(min) = &query.min_price {
        q = q.filter(products::price.ge(min.clone()));
    }
    if let Some(max) = &query.max_price {
        q = q.filter(products::price.le(max.clone()));
    }
    q
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn find_all(&self, query: &ProductQuery) -> Result<PageResult<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        // Repeatable read gives the count and the page one snapshot.
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, DomainError, _>(|conn| {
                let total_count: i64 = filtered(query).count().get_result(conn)?;

                let rows = filtered(query)
                    .select(ProductRow::as_select())
                    .order((
                        lower(products::name).asc(),
                        lower(products::brand).asc(),
                        products::id.asc(),
                    ))
                    .limit(query.limit())
                    .offset(query.offset())
                    .load(conn)?;

                Ok(PageResult {
                    items: rows.into_iter().map(Product::from).collect(),
                    total_count,
                    page_number: query.page_number,
                    page_size: query.page_size,
                })
            })
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(NewProductRow::from(&product))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| write_error(e, &product.name, &product.brand))?;

        Ok(row.into())
    }

    fn update(&self, product: Product) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(products::table.find(product.id))
            .set((
                products::name.eq(&product.name),
                products::brand.eq(&product.brand),
                products::price.eq(product.price.clone()),
                products::updated_at.eq(Utc::now()),
            ))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(|e| write_error(e, &product.name, &product.brand))?;

        Ok(row.map(Product::from))
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(affected > 0)
    }

    fn exists(
        &self,
        name: &str,
        brand: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let same_key = products::table
            .filter(lower(products::name).eq(lower(name)))
            .filter(lower(products::brand).eq(lower(brand)));

        let found: bool = match exclude_id {
            Some(id) => diesel::select(exists(same_key.filter(products::id.ne(id))))
                .get_result(&mut conn)?,
            None => diesel::select(exists(same_key)).get_result(&mut conn)?,
        };
        Ok(found)
    }
}
