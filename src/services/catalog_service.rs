use crate::{
    catalog::Category,
    dto::items::CategoryList,
    measurements::{required_slots, slot_names},
    models::CategoryInfo,
    response::ApiResponse,
};

pub fn describe(category: Category) -> CategoryInfo {
    CategoryInfo {
        key: category,
        label: category.label().to_string(),
        plural: category.plural().to_string(),
        required_slots: required_slots(category).into_iter().map(str::to_string).collect(),
        slots: slot_names(category).into_iter().map(str::to_string).collect(),
    }
}

pub fn list_categories() -> ApiResponse<CategoryList> {
    let items = Category::ALL.into_iter().map(describe).collect();
    ApiResponse::success("Categories", CategoryList { items }, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_is_listed_once() {
        let list = list_categories().data.unwrap().items;
        assert_eq!(list.len(), Category::ALL.len());
        let mirror = list.iter().find(|c| c.key == Category::Mirror).unwrap();
        assert_eq!(mirror.label, "Espejo");
        assert_eq!(mirror.plural, "Espejos");
        assert_eq!(mirror.required_slots, vec!["height", "width"]);
        assert_eq!(mirror.slots, vec!["height", "width"]);
    }

    #[test]
    fn column_lists_optional_slot() {
        let column = describe(Category::Column);
        assert_eq!(column.required_slots, vec!["height"]);
        assert_eq!(column.slots, vec!["height", "sides"]);
    }
}
