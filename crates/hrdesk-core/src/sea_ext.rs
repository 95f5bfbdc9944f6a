use sea_orm::{
    Condition, QueryFilter,
    sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};

/// `LOWER(column) LIKE '%needle%'`, with LIKE wildcards in `needle` matched literally.
pub fn contains_ignore_case<C>(column: C, needle: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub trait FilterContainsAny: QueryFilter + Sized {
    /// Keep rows where any of `columns` contains `needle`, ignoring case.
    /// A missing or blank needle leaves the query untouched.
    fn filter_contains_any<C, I>(self, columns: I, needle: Option<&str>) -> Self
    where
        C: IntoColumnRef,
        I: IntoIterator<Item = C>,
    {
        let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
            return self;
        };
        let condition = columns
            .into_iter()
            .fold(Condition::any(), |cond, column| {
                cond.add(contains_ignore_case(column, needle))
            });
        self.filter(condition)
    }
}

impl<Q> FilterContainsAny for Q where Q: QueryFilter + Sized {}
