use super::*;

#[test]
fn eq_operator_serializes_to_bare_field() {
    let mut filters = FilterState::default();
    filters.height = NumericFilter::new(Operator::Eq, "180");
    filters.weight = NumericFilter::new(Operator::Gte, "60.5");
    filters.coordinates_y = NumericFilter::new(Operator::Lt, " 100 ");

    let query = filters.to_query();
    assert_eq!(query.get("height").map(String::as_str), Some("180"));
    assert_eq!(query.get("weight[gte]").map(String::as_str), Some("60.5"));
    assert_eq!(query.get("coordinates.y[lt]").map(String::as_str), Some("100"));
    assert_eq!(query.len(), 3);
}

#[test]
fn every_non_eq_operator_is_bracketed() {
    for op in Operator::NUMERIC.iter().copied().filter(|op| *op != Operator::Eq) {
        let mut filters = FilterState::default();
        filters.coordinates_x = NumericFilter::new(op, "5");
        let query = filters.to_query();
        let expected = format!("coordinates.x[{}]", op.as_str());
        assert_eq!(query.get(&expected).map(String::as_str), Some("5"), "{op:?}");
    }
}

#[test]
fn empty_fields_are_omitted() {
    let mut filters = FilterState::default();
    filters.height = NumericFilter::new(Operator::Gt, "   ");
    filters.location_name = " ".into();
    assert!(filters.to_query().is_empty());
    assert_eq!(filters.active_filter_count(), 0);
}

#[test]
fn text_and_categorical_filters() {
    let mut filters = FilterState {
        name_search: "ann".into(),
        hair_color: Some(Color::Blue),
        eye_color: Some(Color::Orange),
        nationality: Some(Country::India),
        location_name: "Paris".into(),
        ..FilterState::default()
    };

    let query = filters.to_query();
    assert_eq!(query.get("name[like]").map(String::as_str), Some("ann"));
    assert_eq!(query.get("hairColor").map(String::as_str), Some("BLUE"));
    assert_eq!(query.get("eyeColor").map(String::as_str), Some("ORANGE"));
    assert_eq!(query.get("nationality").map(String::as_str), Some("INDIA"));
    assert_eq!(
        query.get("location.name[like]").map(String::as_str),
        Some("Paris")
    );
    assert_eq!(filters.active_filter_count(), 4);

    filters.clear();
    assert_eq!(filters, FilterState::default());
}

#[test]
fn parses_numeric_condition_expressions() {
    let condition: NumericCondition = "height>=170".parse().expect("parse");
    assert_eq!(condition.field, NumericField::Height);
    assert_eq!(condition.filter, NumericFilter::new(Operator::Gte, "170"));

    let condition: NumericCondition = "coordinates.y ≤ 626".parse().expect("parse");
    assert_eq!(condition.field, NumericField::CoordinatesY);
    assert_eq!(condition.filter.operator, Operator::Lte);

    let condition: NumericCondition = "x=3".parse().expect("parse");
    assert_eq!(condition.filter.operator, Operator::Eq);

    assert_eq!(
        "weight".parse::<NumericCondition>(),
        Err(QueryError::MissingOperator("weight".into()))
    );
    assert_eq!(
        "weight>".parse::<NumericCondition>(),
        Err(QueryError::MissingValue("weight>".into()))
    );
    assert!(matches!(
        "age>3".parse::<NumericCondition>(),
        Err(QueryError::UnknownField(_))
    ));
}

#[test]
fn numeric_condition_value_must_be_a_number() {
    assert_eq!(
        "height=>170".parse::<NumericCondition>(),
        Err(QueryError::InvalidValue("height=>170".into()))
    );
    assert_eq!(
        "weight<abc".parse::<NumericCondition>(),
        Err(QueryError::InvalidValue("weight<abc".into()))
    );

    let condition: NumericCondition = "coordinates.x>-12.5".parse().expect("negative");
    assert_eq!(condition.filter, NumericFilter::new(Operator::Gt, "-12.5"));
}

#[test]
fn toggle_cycles_ascending_descending_removed() {
    let mut sort = SortSpec::default();
    assert_eq!(sort.toggle(SortField::Name), Some(SortDirection::Ascending));
    assert_eq!(sort.params(), vec![("sortBy".to_string(), "name".to_string())]);

    assert_eq!(sort.toggle(SortField::Name), Some(SortDirection::Descending));
    assert_eq!(sort.params(), vec![("sortBy".to_string(), "-name".to_string())]);

    assert_eq!(sort.toggle(SortField::Name), None);
    assert!(sort.is_empty());
}

#[test]
fn removing_a_field_preserves_order_of_the_rest() {
    let mut sort = SortSpec::default();
    sort.toggle(SortField::Name);
    sort.toggle(SortField::Weight);
    sort.toggle(SortField::CreationDate);
    sort.toggle(SortField::Weight);
    assert_eq!(sort.joined(), "name,-weight,creationDate");

    sort.toggle(SortField::Weight);
    assert_eq!(sort.joined(), "name,creationDate");
    assert_eq!(sort.direction(SortField::Weight), None);

    assert!(sort.remove(SortField::Name));
    assert!(!sort.remove(SortField::Name));
    assert_eq!(sort.joined(), "creationDate");

    sort.clear();
    assert!(sort.params().is_empty());
}

#[test]
fn sort_keys_parse_descending_prefix() {
    let spec = SortSpec::from_keys(
        ["-weight", "name", "weight"]
            .iter()
            .map(|raw| raw.parse::<SortKey>().expect("sort key")),
    );
    assert_eq!(spec.joined(), "weight,name");
    assert!(matches!(
        "-shoe".parse::<SortKey>(),
        Err(QueryError::UnknownSortField(_))
    ));
}

#[test]
fn list_query_orders_paging_filters_then_sort() {
    let mut filters = QueryMap::new();
    filters.insert("weight[gt]".into(), "50".into());
    let mut sort = SortSpec::default();
    sort.toggle(SortField::Height);
    sort.toggle(SortField::Name);
    sort.toggle(SortField::Name);

    let query = ListQuery {
        page: 2,
        size: 10,
        filters,
        sort,
    };

    let params = query.params();
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("page", "2"),
            ("size", "10"),
            ("weight[gt]", "50"),
            ("sortBy", "height"),
            ("sortBy", "-name"),
        ]
    );
}
