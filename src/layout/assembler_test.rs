#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::classify::{ScreenMetrics, WidgetKind};
    use crate::config::{ConvertOptions, DuplicateIdPolicy};
    use crate::error::ConvertError;

    const SEARCH_SCREEN: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy index="0" class="hierarchy" rotation="0" width="1080" height="1812">
  <android.widget.FrameLayout index="0" class="android.widget.FrameLayout" text="" clickable="false" bounds="[0,0][1080,1920]" displayed="true">
    <!-- EditText element -->
    <android.widget.EditText index="0" class="android.widget.EditText" text="" resource-id="searchBox" clickable="true" focusable="true" bounds="[126,243][1023,315]" displayed="true" hint="Enter code" />
    <!-- TextView element -->
    <android.widget.TextView index="1" class="android.widget.TextView" text="Search" clickable="false" bounds="[447,99][633,177]" displayed="true" hint="" />
    <!-- Button element -->
    <android.widget.Button index="2" class="android.widget.Button" text="Go" clickable="true" bounds="[900,243][1023,315]" displayed="true" hint="" />
  </android.widget.FrameLayout>
</hierarchy>"#;

    const MULTI_ELEMENT_SCREEN: &str = r#"<hierarchy class="hierarchy">
  <android.widget.FrameLayout class="android.widget.FrameLayout">
    <android.widget.EditText class="android.widget.EditText" text="" resource-id="searchBox" hint="请输入证券代码或简拼" />
    <android.widget.TextView class="android.widget.TextView" text="股票搜索" />
    <android.widget.Button class="android.widget.Button" text="搜索" clickable="true" />
    <android.widget.ImageButton class="android.widget.ImageButton" text="" clickable="true" />
    <android.widget.ImageView class="android.widget.ImageView" text="" clickable="false" />
  </android.widget.FrameLayout>
</hierarchy>"#;

    fn fields(input: &str) -> Vec<LayoutField> {
        convert_with_stats(input, &ConvertOptions::default())
            .unwrap()
            .layout
            .fields
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_search_screen_produces_three_fields_in_order() {
        let fields = fields(SEARCH_SCREEN);
        let kinds: Vec<_> = fields.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WidgetKind::EditableField,
                WidgetKind::StaticText,
                WidgetKind::Button
            ]
        );
        assert_eq!(fields[0].hint.as_deref(), Some("Enter code"));
        assert_eq!(fields[1].text.as_deref(), Some("Search"));
        assert_eq!(fields[2].text.as_deref(), Some("Go"));
    }

    #[test]
    fn test_search_screen_xml() {
        let xml = convert(SEARCH_SCREEN, &ConvertOptions::default()).unwrap();

        assert_eq!(count(&xml, "<GridLayout"), 1);
        assert!(xml.contains("android:columnCount=\"3\""));
        assert!(xml.contains("android:padding=\"16dp\""));
        assert_eq!(count(&xml, "<EditText"), 1);
        assert_eq!(count(&xml, "android:hint=\"Enter code\""), 1);
        assert!(xml.contains("android:text=\"Search\""));
        assert!(xml.contains("android:text=\"Go\""));

        let edit = xml.find("<EditText").unwrap();
        let label = xml.find("<TextView").unwrap();
        let button = xml.find("<Button").unwrap();
        assert!(edit < label && label < button);
    }

    #[test]
    fn test_multi_element_screen_includes_every_kind() {
        let xml = convert(MULTI_ELEMENT_SCREEN, &ConvertOptions::default()).unwrap();

        assert!(xml.contains("<EditText"));
        assert!(xml.contains("android:hint=\"请输入证券代码或简拼\""));
        assert!(xml.contains("<TextView"));
        assert!(xml.contains("android:text=\"股票搜索\""));
        assert!(xml.contains("<Button"));
        assert!(xml.contains("android:text=\"搜索\""));
        assert!(xml.contains("<ImageButton"));
        assert!(xml.contains("android:contentDescription=\"Image button\""));
        assert!(xml.contains("<ImageView"));
        assert!(!xml.contains("<FrameLayout"));
        assert!(!xml.contains("<View"));
    }

    #[test]
    fn test_containers_and_empty_labels_are_not_emitted() {
        let input = r#"<hierarchy>
  <android.widget.LinearLayout class="android.widget.LinearLayout">
    <android.widget.TextView class="android.widget.TextView" text="" />
    <android.view.View class="android.view.View" />
    <android.widget.TextView class="android.widget.TextView" text="Visible" />
  </android.widget.LinearLayout>
</hierarchy>"#;
        let conversion = convert_with_stats(input, &ConvertOptions::default()).unwrap();

        assert_eq!(conversion.layout.len(), 1);
        assert_eq!(conversion.stats.total_nodes, 5);
        assert_eq!(conversion.stats.emitted_fields, 1);
        assert_eq!(conversion.stats.skipped_containers, 3);
        assert_eq!(conversion.stats.skipped_empty, 1);
    }

    #[test]
    fn test_clickable_wrapper_yields_only_its_content() {
        let input = r#"<hierarchy>
  <android.view.View class="android.view.View" clickable="true">
    <android.widget.TextView class="android.widget.TextView" text="Login" />
  </android.view.View>
</hierarchy>"#;
        let conversion = convert_with_stats(input, &ConvertOptions::default()).unwrap();

        let kinds: Vec<_> = conversion.layout.fields.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![WidgetKind::StaticText]);
        assert_eq!(conversion.layout.fields[0].text.as_deref(), Some("Login"));
        assert_eq!(conversion.stats.skipped_containers, 2);
        assert_eq!(conversion.stats.skipped_empty, 0);
    }

    #[test]
    fn test_nested_elements_follow_pre_order() {
        let input = r#"<hierarchy>
  <android.widget.LinearLayout class="android.widget.LinearLayout">
    <android.widget.TextView class="android.widget.TextView" text="one" />
    <android.widget.LinearLayout class="android.widget.LinearLayout">
      <android.widget.TextView class="android.widget.TextView" text="two" />
    </android.widget.LinearLayout>
  </android.widget.LinearLayout>
  <android.widget.TextView class="android.widget.TextView" text="three" />
</hierarchy>"#;
        let texts: Vec<_> = fields(input)
            .into_iter()
            .filter_map(|f| f.text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_grid_cells_wrap_every_three_fields() {
        let mut input = String::from("<hierarchy>");
        for i in 0..7 {
            input.push_str(&format!(
                "<node class=\"android.widget.TextView\" text=\"label {i}\"/>"
            ));
        }
        input.push_str("</hierarchy>");

        let cells: Vec<_> = fields(&input).iter().map(|f| (f.row, f.column)).collect();
        assert_eq!(
            cells,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]
        );
    }

    #[test]
    fn test_every_field_meets_minimum_footprint() {
        let metrics = ScreenMetrics::new(1440, 3040, 3.5).unwrap();
        let options = ConvertOptions::with_metrics(metrics);
        let conversion = convert_with_stats(MULTI_ELEMENT_SCREEN, &options).unwrap();

        let quarter_px = f64::from(metrics.width_px) / 4.0;
        let density = f64::from(metrics.density);
        for field in &conversion.layout.fields {
            assert!(f64::from(field.min_width_dp) * density >= quarter_px);
            assert!(f64::from(field.min_height_dp) * density >= quarter_px);
            assert_eq!(field.layout_width_dp, metrics.max_field_width_dp());
        }

        let xml = conversion.to_xml();
        assert_eq!(count(&xml, "android:minWidth=\"103dp\""), 5);
        assert_eq!(count(&xml, "android:minHeight=\"103dp\""), 5);
    }

    #[test]
    fn test_captured_bounds_do_not_leak_into_output() {
        let xml = convert(SEARCH_SCREEN, &ConvertOptions::default()).unwrap();
        assert!(!xml.contains("897"));
        assert!(!xml.contains("126"));
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let options = ConvertOptions::default();
        let first = convert(MULTI_ELEMENT_SCREEN, &options).unwrap();
        let second = convert(MULTI_ELEMENT_SCREEN, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reader_matches_str_conversion() {
        let options = ConvertOptions::default();
        let from_str = convert(SEARCH_SCREEN, &options).unwrap();
        let from_reader = convert_reader(SEARCH_SCREEN.as_bytes(), &options).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_identifiers_from_resource_id_or_position() {
        let fields = fields(MULTI_ELEMENT_SCREEN);
        let ids: Vec<_> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["searchBox", "field_1", "field_2", "field_3", "field_4"]);
    }

    const DUPLICATE_IDS: &str = r#"<hierarchy>
  <node class="android.widget.Button" text="A" resource-id="com.app:id/ok" />
  <node class="android.widget.Button" text="B" resource-id="com.app:id/ok" />
</hierarchy>"#;

    #[test]
    fn test_duplicate_ids_are_suffixed_by_default() {
        let conversion = convert_with_stats(DUPLICATE_IDS, &ConvertOptions::default()).unwrap();
        let ids: Vec<_> = conversion.layout.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "ok_2"]);
        assert_eq!(conversion.stats.renamed_ids, 1);
    }

    #[test]
    fn test_duplicate_ids_can_be_kept() {
        let options = ConvertOptions {
            duplicate_ids: DuplicateIdPolicy::Keep,
            ..ConvertOptions::default()
        };
        let xml = convert(DUPLICATE_IDS, &options).unwrap();
        assert_eq!(count(&xml, "android:id=\"@+id/ok\""), 2);
    }

    #[test]
    fn test_duplicate_ids_can_fail() {
        let options = ConvertOptions {
            duplicate_ids: DuplicateIdPolicy::Error,
            ..ConvertOptions::default()
        };
        let err = convert(DUPLICATE_IDS, &options).unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateId { first: 0, second: 1, .. }));
    }

    #[test]
    fn test_malformed_input_returns_no_output() {
        let err = convert("<hierarchy><node></hierarchy>", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = convert("", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput));
    }

    #[test]
    fn test_grid_without_fields() {
        let xml = convert(
            "<hierarchy><android.widget.FrameLayout class=\"android.widget.FrameLayout\"/></hierarchy>",
            &ConvertOptions::default(),
        )
        .unwrap();
        assert!(xml.contains("android:columnCount=\"3\""));
        assert!(xml.contains("android:padding=\"16dp\""));
        assert_eq!(count(&xml, "android:id="), 0);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let input = r#"<hierarchy><node class="android.widget.TextView" text="Fish &amp; &lt;Chips&gt;"/></hierarchy>"#;
        let xml = convert(input, &ConvertOptions::default()).unwrap();
        assert!(xml.contains("android:text=\"Fish &amp; &lt;Chips&gt;\""));
        assert!(crate::hierarchy::parse_hierarchy(&xml).is_ok());
    }
}
