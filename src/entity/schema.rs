//! 模型结构描述
//!
//! 每个实体除了 SeaORM 的表结构之外，再通过 [`ModelSchema`] 声明
//! 类型化客户端需要的元信息：唯一键、可聚合的数值列，以及时间戳的自动填充规则。

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, EntityTrait, Set, Value};

pub trait ModelSchema: EntityTrait {
    /// 模型名，用于日志与错误信息
    const NAME: &'static str;

    /// 全部唯一键，主键排在第一位；复合唯一键以多列表示
    fn unique_keys() -> Vec<Vec<Self::Column>>;

    /// 允许 avg / sum / min / max 的列
    fn numeric_columns() -> Vec<Self::Column> {
        Vec::new()
    }

    /// 写入前填充时间戳；`inserting` 为 true 时表示新建记录
    fn stamp(_model: &mut Self::ActiveModel, _now: i64, _inserting: bool) {}
}

/// 仅在字段未赋值时写入
pub(crate) fn fill_if_unset<V>(value: &mut ActiveValue<V>, fill: V)
where
    V: Into<Value>,
{
    if value.is_not_set() {
        *value = Set(fill);
    }
}

/// 通用的 created_at / updated_at 填充
pub(crate) fn stamp_pair(
    created_at: &mut ActiveValue<i64>,
    updated_at: &mut ActiveValue<i64>,
    now: i64,
    inserting: bool,
) {
    if inserting {
        fill_if_unset(created_at, now);
    }
    *updated_at = Set(now);
}

/// Unix 秒转为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::NotSet;

    #[test]
    fn test_fill_if_unset_keeps_existing() {
        let mut value: ActiveValue<i64> = Set(5);
        fill_if_unset(&mut value, 10);
        assert_eq!(value, Set(5));

        let mut empty: ActiveValue<i64> = NotSet;
        fill_if_unset(&mut empty, 10);
        assert_eq!(empty, Set(10));
    }

    #[test]
    fn test_stamp_pair_on_update_only_touches_updated_at() {
        let mut created: ActiveValue<i64> = NotSet;
        let mut updated: ActiveValue<i64> = Set(1);
        stamp_pair(&mut created, &mut updated, 42, false);
        assert_eq!(created, NotSet);
        assert_eq!(updated, Set(42));
    }

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
