use std::fs;
use std::path::PathBuf;

use polars::prelude::*;

use accidata::{clean_table, Error, Table};


const LIEUX_CSV: &str = "\
Num_Acc;catr;voie;v1;v2;circ;nbv;vosp;prof;pr;pr1;plan;lartpc;larrout;surf;infra;situ;vma
202300000001;3;AVENUE DES ARTS;1;B;2;2;0;1;5;100;1;0;5,25;1;0;1;50
202300000002;1;A6;0;C;1;#ERREUR;0;1;12;450;2;0;-1,0000;1;3;1;110
";


const USAGERS_CSV: &str = "\
Num_Acc;id_usager;id_vehicule;num_veh;place;catu;grav;sexe;an_nais;trajet;secu1;secu2;secu3;locp;actp;etatp
202300000001;1 001;155000001;A01;1;1;1;1;1990;5;1;0;-1;0;0;-1
202300000001;1 002;155000001;A01;2;2;3;2;;0;1;-1;-1;0;A;1
202300000002;1 003;155000002;B01;1;1;4;1;1955;9;2;-1;-1;2;-1;2
";


const VEHICULES_CSV: &str = "\
Num_Acc;id_vehicule;num_veh;senc;catv;obs;obsm;choc;manv;motor;occutc
202300000001;155000001;A01;1;7;0;2;1;1;1;0
202300000002;155000002;B01;2;33;0;1;3;2;5;0
";


const CARCTERISTIQUES_CSV: &str = "\
Accident_Id;jour;mois;an;hrmn;lum;dep;com;agg;int;atm;col;adr;lat;long
202300000001;15;6;2023;1437;1;75;75056;2;1;1;3;12 RUE DE LA PAIX;48,8566;2,3522
202300000002;16;6;2023;0005;5;13;13001;1;1;1;2;ROUTE DE MARSEILLE;43,2965;5,3698
";


/// A scratch data directory under the system temp directory,
/// unique per test so parallel tests never collide.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("accidata-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("2023")).unwrap();
    dir
}


fn write_csv(dir: &PathBuf, file: &str, content: &str) {
    fs::write(dir.join("2023").join(file), content).unwrap();
}


#[test]
fn lieux_drops_transforms_and_narrows() {
    let dir = scratch_dir("lieux");
    write_csv(&dir, "lieux-2023.csv", LIEUX_CSV);

    let df = clean_table(Table::Lieux, 2023, &dir).unwrap();
    println!("{df}");

    // The location-reference columns are gone.
    for dropped in ["voie", "v1", "v2", "pr", "pr1", "lartpc"] {
        assert!(!df.get_column_names().contains(&dropped));
    }

    // The accident id keeps its full width, the road width needs
    // sixteen bits after the centimetre scaling, the rest shrinks
    // to eight.
    assert_eq!(df.column("Num_Acc").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("larrout").unwrap().dtype(), &DataType::Int16);
    assert_eq!(df.column("vma").unwrap().dtype(), &DataType::Int8);

    let larrout = df.column("larrout").unwrap().i16().unwrap();
    assert_eq!(larrout.get(0), Some(525));
    assert_eq!(larrout.get(1), Some(-1));

    let nbv = df.column("nbv").unwrap().i8().unwrap();
    assert_eq!(nbv.get(0), Some(2));
    assert_eq!(nbv.get(1), Some(-1));
}


#[test]
fn usagers_derives_age_and_decodes_actp() {
    let dir = scratch_dir("usagers");
    write_csv(&dir, "usagers-2023.csv", USAGERS_CSV);

    let df = clean_table(Table::Usagers, 2023, &dir).unwrap();
    println!("{df}");

    assert!(!df.get_column_names().contains(&"id_usager"));
    assert!(!df.get_column_names().contains(&"num_veh"));
    assert!(!df.get_column_names().contains(&"an_nais"));

    // 1990 and 1955 become ages; the missing birth year becomes
    // the sentinel rather than an error.
    let age = df.column("age").unwrap().i8().unwrap();
    assert_eq!(age.get(0), Some(33));
    assert_eq!(age.get(1), Some(-1));
    assert_eq!(age.get(2), Some(68));

    let actp = df.column("actp").unwrap().i8().unwrap();
    assert_eq!(actp.get(0), Some(0));
    assert_eq!(actp.get(1), Some(10));
    assert_eq!(actp.get(2), Some(-1));

    // Both join keys survive at full width.
    assert_eq!(df.column("Num_Acc").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("id_vehicule").unwrap().dtype(), &DataType::Int64);
}


#[test]
fn vehicules_keeps_only_the_vehicle_key() {
    let dir = scratch_dir("vehicules");
    write_csv(&dir, "vehicules-2023.csv", VEHICULES_CSV);

    let df = clean_table(Table::Vehicules, 2023, &dir).unwrap();
    println!("{df}");

    // The accident id of this table is redundant with the victims
    // table and goes away with the other unused columns.
    assert!(!df.get_column_names().contains(&"Num_Acc"));
    assert!(!df.get_column_names().contains(&"num_veh"));
    assert!(!df.get_column_names().contains(&"occutc"));

    assert_eq!(df.column("id_vehicule").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("catv").unwrap().dtype(), &DataType::Int8);
}


#[test]
fn carcteristiques_buckets_time_and_remaps_codes() {
    let dir = scratch_dir("carcteristiques");
    write_csv(&dir, "carcteristiques-2023.csv", CARCTERISTIQUES_CSV);

    let df = clean_table(Table::Carcteristiques, 2023, &dir).unwrap();
    println!("{df}");

    // The record id takes the shared accident-id name.
    assert!(df.get_column_names().contains(&"Num_Acc"));
    assert!(!df.get_column_names().contains(&"Accident_Id"));

    // 14:37 lands in bucket 73, 00:05 in bucket 0.
    let hrmn = df.column("hrmn").unwrap().i8().unwrap();
    assert_eq!(hrmn.get(0), Some(73));
    assert_eq!(hrmn.get(1), Some(0));

    // Departments 75 and 13 remap to contiguous indices
    // in ascending code order.
    let dep = df.column("dep").unwrap().i8().unwrap();
    assert_eq!(dep.get(0), Some(1));
    assert_eq!(dep.get(1), Some(0));

    assert_eq!(df.column("com").unwrap().dtype(), &DataType::Int16);
    let com = df.column("com").unwrap().i16().unwrap();
    assert_eq!(com.get(0), Some(1));
    assert_eq!(com.get(1), Some(0));
}


#[test]
fn an_absent_source_file_fails_with_its_path() {
    let dir = scratch_dir("absent");

    let err = clean_table(Table::Lieux, 2023, &dir).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}


#[test]
fn a_drifted_schema_names_table_and_column() {
    let dir = scratch_dir("drifted");
    // No `voie` column.
    write_csv(&dir, "lieux-2023.csv", "\
Num_Acc;catr;v1;v2;circ;nbv;vosp;prof;pr;pr1;plan;lartpc;larrout;surf;infra;situ;vma
202300000001;3;1;B;2;2;0;1;5;100;1;0;5,25;1;0;1;50
");

    let err = clean_table(Table::Lieux, 2023, &dir).unwrap_err();
    match err {
        Error::MissingColumn { table, column } => {
            assert_eq!(table, "lieux");
            assert_eq!(column, "voie");
        },
        other => panic!("expected MissingColumn, got {other}"),
    }
}


#[test]
fn a_narrowing_overflow_is_a_hard_failure() {
    let dir = scratch_dir("overflow");
    // 130 km/h does not fit the 8-bit speed column.
    write_csv(&dir, "lieux-2023.csv", "\
Num_Acc;catr;voie;v1;v2;circ;nbv;vosp;prof;pr;pr1;plan;lartpc;larrout;surf;infra;situ;vma
202300000001;1;A1;0;C;1;2;0;1;5;100;1;0;10,00;1;0;1;130
");

    let err = clean_table(Table::Lieux, 2023, &dir).unwrap_err();
    match err {
        Error::NarrowOverflow { column, value, width } => {
            assert_eq!(column, "vma");
            assert_eq!(value, 130);
            assert_eq!(width, "int8");
        },
        other => panic!("expected NarrowOverflow, got {other}"),
    }
}


#[test]
fn a_malformed_field_names_its_column() {
    let dir = scratch_dir("malformed");
    // The lane count holds free text.
    write_csv(&dir, "lieux-2023.csv", "\
Num_Acc;catr;voie;v1;v2;circ;nbv;vosp;prof;pr;pr1;plan;lartpc;larrout;surf;infra;situ;vma
202300000001;3;D7;0;C;1;three;0;1;5;100;1;0;5,25;1;0;1;50
");

    let err = clean_table(Table::Lieux, 2023, &dir).unwrap_err();
    match err {
        Error::MalformedField { column, value, .. } => {
            assert_eq!(column, "nbv");
            assert_eq!(value, "three");
        },
        other => panic!("expected MalformedField, got {other}"),
    }
}
