//! Tables written to real files and read back through every codec.


use std::{
    fs::File,
    io::{BufReader, BufWriter, Seek, SeekFrom, Write},
};

use anyhow::Result;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use tabfn::{
    CodecError, StorageKind, TabulatedFunction,
    functions::{
        ArrayTabulatedFunction, ArrayTabulatedFunctionFactory, LinkedListTabulatedFunction,
        LinkedListTabulatedFunctionFactory, SqrFunction, from_fn,
    },
    io::{TextFormat, deserialize, read_binary, read_text, serialize, write_binary, write_text},
};

fn bits(table: &dyn TabulatedFunction) -> Vec<(u64, u64)> {
    table
        .points()
        .iter()
        .map(|p| (p.x.to_bits(), p.y.to_bits()))
        .collect()
}

fn sample_tables() -> Result<(ArrayTabulatedFunction, LinkedListTabulatedFunction)> {
    Ok((
        ArrayTabulatedFunction::from_function(&SqrFunction, -2.0, 2.0, 11)?,
        LinkedListTabulatedFunction::new(&[0.1, 0.2, 0.7], &[-1.0 / 3.0, 1e-12, 42.0])?,
    ))
}

#[test]
fn test_text_file_in_comma_format() -> Result<()> {
    test_utils::init_logging();

    let mut file = tempfile::tempfile()?;
    file.write_all(b"3\n0,0 0,0\n1,0 1,0\n2,5 6,25\n")?;
    file.seek(SeekFrom::Start(0))?;

    let table = read_text(
        &mut BufReader::new(file),
        &LinkedListTabulatedFunctionFactory,
        &TextFormat::default(),
    )?;
    assert_eq!(table.kind(), StorageKind::LinkedList);
    assert_eq!(table.x_values(), vec![0.0, 1.0, 2.5]);
    assert_eq!(table.y_values(), vec![0.0, 1.0, 6.25]);
    Ok(())
}

#[test]
fn test_text_file_holds_several_tables() -> Result<()> {
    let (array, list) = sample_tables()?;
    let format = TextFormat::default();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tables.txt");

    {
        let mut writer = BufWriter::new(File::create(&path)?);
        write_text(&mut writer, &array, &format)?;
        write_text(&mut writer, &list, &format)?;
    }

    let mut reader = BufReader::new(File::open(&path)?);
    let first = read_text(&mut reader, &ArrayTabulatedFunctionFactory, &format)?;
    let second = read_text(&mut reader, &LinkedListTabulatedFunctionFactory, &format)?;

    assert_eq!(first.points(), array.points());
    assert_eq!(second.points(), list.points());
    Ok(())
}

#[test]
fn test_binary_file_is_bit_exact() -> Result<()> {
    let (array, list) = sample_tables()?;
    let mut file = tempfile::tempfile()?;
    write_binary(&mut file, &array)?;
    write_binary(&mut file, &list)?;

    // 4-byte count plus 16 bytes per sample for each table
    assert_eq!(file.metadata()?.len(), (4 + 16 * 11) + (4 + 16 * 3));

    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);
    let first = read_binary(&mut reader, &LinkedListTabulatedFunctionFactory)?;
    let second = read_binary(&mut reader, &ArrayTabulatedFunctionFactory)?;

    assert_eq!(bits(&*first), bits(&array));
    assert_eq!(bits(&*second), bits(&list));
    assert_eq!(first.kind(), StorageKind::LinkedList);
    Ok(())
}

#[test]
fn test_truncated_files_report_end_of_input() -> Result<()> {
    let (array, _) = sample_tables()?;
    let mut bytes = Vec::new();
    write_binary(&mut bytes, &array)?;
    bytes.truncate(bytes.len() - 3);

    let err = read_binary(&mut bytes.as_slice(), &ArrayTabulatedFunctionFactory).unwrap_err();
    assert!(matches!(
        err,
        CodecError::UnexpectedEof {
            expected: 11,
            found: 10,
            ..
        }
    ));

    let mut text = Vec::new();
    write_text(&mut text, &array, &TextFormat::default())?;
    let cut = String::from_utf8(text)?;
    let cut: String = cut.lines().take(5).map(|line| format!("{}\n", line)).collect();
    let err = read_text(
        &mut cut.as_bytes(),
        &ArrayTabulatedFunctionFactory,
        &TextFormat::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CodecError::UnexpectedEof {
            expected: 11,
            found: 4,
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_object_file_keeps_storage_and_absence() -> Result<()> {
    let (array, list) = sample_tables()?;
    let mut file = tempfile::tempfile()?;
    serialize(&mut file, Some(&list))?;
    serialize(&mut file, None)?;
    serialize(&mut file, Some(&array))?;

    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);

    let first = deserialize(&mut reader)?.expect("a list table");
    assert_eq!(first.kind(), StorageKind::LinkedList);
    assert_eq!(first.points(), list.points());
    assert!(deserialize(&mut reader)?.is_none());
    let third = deserialize(&mut reader)?.expect("an array table");
    assert_eq!(third.kind(), StorageKind::Array);
    assert_eq!(third.points(), array.points());

    assert!(deserialize(&mut reader).unwrap_err().is_malformed_input());
    Ok(())
}

#[test]
fn test_object_file_keeps_non_finite_samples() -> Result<()> {
    let mut table = ArrayTabulatedFunction::from_function(&from_fn(|x| 1.0 / x), -1.0, 1.0, 3)?;
    table.set_y(0, f64::NAN)?;
    let list = LinkedListTabulatedFunction::new(&[0.0, f64::INFINITY], &[f64::NEG_INFINITY, -0.0])?;

    let mut file = tempfile::tempfile()?;
    serialize(&mut file, Some(&table))?;
    serialize(&mut file, Some(&list))?;
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);

    let first = deserialize(&mut reader)?.expect("an array table");
    let second = deserialize(&mut reader)?.expect("a list table");
    assert_eq!(bits(&*first), bits(&table));
    assert_eq!(bits(&*second), bits(&list));
    assert!(first.get_y(0)?.is_nan());
    assert_eq!(first.get_y(1)?, f64::INFINITY);
    Ok(())
}

#[test]
fn test_unreadable_content_is_malformed_input() {
    let text: &[u8] = b"2\n0 0\n1 \xff\n";
    let err = read_text(
        &mut &text[..],
        &ArrayTabulatedFunctionFactory,
        &TextFormat::default(),
    )
    .unwrap_err();
    assert!(err.is_malformed_input(), "{}", err);

    for object in ["{\"kind\":\"array\",\"x_val", "{\"kind\":\"heap\"}\n", "42\n"] {
        let err = deserialize(&mut object.as_bytes()).unwrap_err();
        assert!(err.is_malformed_input(), "{:?} gave {}", object, err);
    }
}

#[test]
fn test_codecs_reject_invalid_tables() {
    let text = "2\n1 0\n1 0\n";
    assert!(matches!(
        read_text(
            &mut text.as_bytes(),
            &ArrayTabulatedFunctionFactory,
            &TextFormat::default()
        ),
        Err(CodecError::Function(_))
    ));

    let mut bytes = 1i32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&f64::NAN.to_be_bytes());
    bytes.extend_from_slice(&0f64.to_be_bytes());
    assert!(matches!(
        read_binary(&mut bytes.as_slice(), &ArrayTabulatedFunctionFactory),
        Err(CodecError::Function(_))
    ));
}

proptest! {
    #[test]
    fn text_round_trip_in_dot_format(
        start in -1e6f64..1e6,
        samples in prop::collection::vec((1e-3f64..1e3, -1e6f64..1e6), 2..20),
    ) {
        let mut x = start;
        let (mut xs, mut ys) = (Vec::new(), Vec::new());
        for (gap, y) in samples {
            xs.push(x);
            ys.push(y);
            x += gap;
        }
        let table = ArrayTabulatedFunction::new(&xs, &ys).unwrap();
        let format = TextFormat::new('.', '\t').unwrap();

        let mut out = Vec::new();
        write_text(&mut out, &table, &format).unwrap();
        let back = read_text(&mut out.as_slice(), &LinkedListTabulatedFunctionFactory, &format).unwrap();

        // shortest round-trip formatting restores every value exactly
        prop_assert_eq!(back.points(), table.points());
    }

    #[test]
    fn object_round_trip_is_bit_exact(y_bits in prop::collection::vec(any::<u64>(), 2..50)) {
        let xs: Vec<f64> = (0..y_bits.len()).map(|i| i as f64 / 7.0).collect();
        let ys: Vec<f64> = y_bits.iter().map(|&b| f64::from_bits(b)).collect();
        let table = LinkedListTabulatedFunction::new(&xs, &ys).unwrap();

        let mut out = Vec::new();
        serialize(&mut out, Some(&table)).unwrap();
        let back = deserialize(&mut out.as_slice()).unwrap().unwrap();

        prop_assert_eq!(back.kind(), StorageKind::LinkedList);
        prop_assert_eq!(bits(&*back), bits(&table));
    }
}
