use crate::config::LoadOptions;
use crate::error::Result;
use crate::loader::{EmptyFragmentPolicy, fold_fragments};
use crate::types::{CellValue, RowKeyedMap, Timed};
use crate::utils::{column_cells, require_columns};
use std::path::Path;

/// Fold every record of every fragment into `id -> column -> value`.
///
/// A key seen again in a later fragment keeps its position and has each of
/// the later fragment's columns overwritten. Integral float keys are folded
/// onto the matching integer key.
pub(super) fn collect_rows(dir: &Path, options: &LoadOptions) -> Result<Timed<RowKeyedMap>> {
    let key = options.key_column.as_str();

    fold_fragments(
        dir,
        options,
        EmptyFragmentPolicy::Reject,
        RowKeyedMap::new(),
        |rows, fragment| {
            let frame = &fragment.frame;
            require_columns(frame, &[key])?;

            let ids = column_cells(frame.column(key)?)?;
            let columns = frame
                .get_columns()
                .iter()
                .map(|c| Ok((c.name().to_string(), column_cells(c)?)))
                .collect::<Result<Vec<(String, Vec<CellValue>)>>>()?;

            for (row, id) in ids.into_iter().enumerate() {
                let record = rows.entry(id.into_key()).or_default();
                for (name, values) in &columns {
                    record.insert(name.clone(), values[row].clone());
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FragmentOrder;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn fixture_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_later_fragment_overwrites_fields() {
        let dir = fixture_dir(&[
            ("a.csv", "id,name,status\n1,Dark,Ended\n2,Lost,Ended\n"),
            ("b.csv", "id,status,popularity\n1,Canceled,9.5\n3,Ended,1.25\n"),
        ]);

        let rows = collect_rows(dir.path(), &LoadOptions::default())
            .unwrap()
            .into_value();

        let keys: Vec<_> = rows.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)]
        );

        let first = &rows[&CellValue::Int(1)];
        assert_eq!(first["name"], text("Dark"));
        assert_eq!(first["status"], text("Canceled"));
        assert_eq!(first["popularity"], CellValue::Float(9.5));
        assert_eq!(first["id"], CellValue::Int(1));

        let second = &rows[&CellValue::Int(2)];
        assert!(!second.contains_key("popularity"));
        assert_eq!(rows[&CellValue::Int(3)].len(), 3);
    }

    #[test]
    fn test_null_cells_are_written() {
        let dir = fixture_dir(&[
            ("a.csv", "id,homepage\n1,https://dark.example\n"),
            ("b.csv", "id,homepage\n1,\n"),
        ]);

        let rows = collect_rows(dir.path(), &LoadOptions::default())
            .unwrap()
            .into_value();
        assert_eq!(rows[&CellValue::Int(1)]["homepage"], CellValue::Null);
    }

    #[test]
    fn test_empty_fragment_rejects_everything() {
        let dir = fixture_dir(&[("a.csv", "id,name\n1,Dark\n"), ("b.csv", "")]);
        let err = collect_rows(dir.path(), &LoadOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_FRAGMENT");
    }

    #[test]
    fn test_float_and_integer_keys_coincide() {
        let dir = fixture_dir(&[
            ("a.csv", "id,x\n1,a\n2,b\n"),
            ("b.csv", "id,y\n1.0,c\n2.0,d\n"),
        ]);

        let rows = collect_rows(dir.path(), &LoadOptions::default())
            .unwrap()
            .into_value();

        let keys: Vec<_> = rows.keys().cloned().collect();
        assert_eq!(keys, vec![CellValue::Int(1), CellValue::Int(2)]);
        assert_eq!(rows[&CellValue::Int(1)]["x"], text("a"));
        assert_eq!(rows[&CellValue::Int(1)]["y"], text("c"));
    }

    #[test]
    fn test_blank_keys_share_one_entry() {
        let dir = fixture_dir(&[
            ("a.csv", "id,x\n1,a\n,b\n"),
            ("b.csv", "id,y\n1,c\n,d\n"),
        ]);

        let rows = collect_rows(dir.path(), &LoadOptions::default())
            .unwrap()
            .into_value();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&CellValue::Null]["x"], text("b"));
        assert_eq!(rows[&CellValue::Null]["y"], text("d"));
    }

    #[test]
    fn test_listing_order_yields_same_key_set() {
        let dir = fixture_dir(&[
            ("a.csv", "id,name\n1,Dark\n2,Lost\n"),
            ("b.csv", "id,type\n2,Scripted\n5,Miniseries\n"),
        ]);
        let options = LoadOptions {
            fragment_order: FragmentOrder::Listing,
            ..LoadOptions::default()
        };

        let rows = collect_rows(dir.path(), &options).unwrap().into_value();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[&CellValue::Int(2)].len(), 3);
    }
}
