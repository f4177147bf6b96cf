//! 实例发放器：纯构造，不做任何 I/O。
//! 单用户兑换和批量分发共用同一套构造逻辑，落库由调用方在事务内完成。

use crate::models::*;
use crate::utils::display_code;
use chrono::{DateTime, Utc};

/// 按模板为用户构造一张券实例。折扣条款在此刻快照，
/// 之后模板被改动不影响已发放的实例。
/// validity_override 用于奖励兑换的固定 90 天有效期。
pub fn issue_coupon(
    user_id: i64,
    template: &CouponTemplate,
    validity_override: Option<DateTime<Utc>>,
    source: &str,
    now: DateTime<Utc>,
) -> NewUserCoupon {
    NewUserCoupon {
        user_id,
        template_id: template.id,
        code: display_code(&template.code),
        title: template.title.clone(),
        discount_kind: template.discount_kind,
        discount_value: template.discount_value,
        min_spend: template.min_spend,
        scope_kind: template.scope_kind,
        scope_values: template.scope_values.clone(),
        valid_from: now,
        valid_until: validity_override.unwrap_or(template.valid_until),
        source: source.to_string(),
        created_at: now,
    }
}

pub fn issue_gift_card(
    user_id: i64,
    template: &GiftCardTemplate,
    source: &str,
    now: DateTime<Utc>,
) -> NewUserGiftCard {
    NewUserGiftCard {
        user_id,
        template_id: template.id,
        name: template.name.clone(),
        description: template.description.clone(),
        image_url: template.image_url.clone(),
        source: source.to_string(),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn template() -> CouponTemplate {
        let now = Utc::now();
        CouponTemplate {
            id: 7,
            code: "SPRING20".to_string(),
            title: "Spring sale".to_string(),
            details: String::new(),
            discount_kind: DiscountKind::Percentage,
            discount_value: 20,
            min_spend: 5000,
            scope_kind: ScopeKind::Categories,
            scope_values: Some(r#"["nails","hair"]"#.to_string()),
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(30),
            usage_limit: 100,
            usage_count: 3,
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_issue_coupon_snapshots_terms() {
        let now = Utc::now();
        let tpl = template();
        let record = issue_coupon(11, &tpl, None, SOURCE_CODE_CLAIM, now);

        assert_eq!(record.user_id, 11);
        assert_eq!(record.template_id, 7);
        assert!(record.code.starts_with("SPRING20-"));
        assert_eq!(record.discount_kind, DiscountKind::Percentage);
        assert_eq!(record.discount_value, 20);
        assert_eq!(record.scope_values.as_deref(), Some(r#"["nails","hair"]"#));
        assert_eq!(record.valid_from, now);
        assert_eq!(record.valid_until, tpl.valid_until);
    }

    #[test]
    fn test_issue_coupon_validity_override() {
        let now = Utc::now();
        let override_until = now + Duration::days(90);
        let record = issue_coupon(11, &template(), Some(override_until), "Free manicure", now);

        assert_eq!(record.valid_until, override_until);
        assert_eq!(record.source, "Free manicure");
    }

    #[test]
    fn test_issue_gift_card_snapshots_fields() {
        let now = Utc::now();
        let tpl = GiftCardTemplate {
            id: 3,
            name: "Spa day".to_string(),
            description: "One full spa session".to_string(),
            image_url: Some("https://cdn.example.com/spa.png".to_string()),
            is_active: true,
            created_at: now,
        };
        let record = issue_gift_card(5, &tpl, SOURCE_CAMPAIGN, now);

        assert_eq!(record.template_id, 3);
        assert_eq!(record.name, "Spa day");
        assert_eq!(record.image_url.as_deref(), Some("https://cdn.example.com/spa.png"));
        assert_eq!(record.source, SOURCE_CAMPAIGN);
    }
}
