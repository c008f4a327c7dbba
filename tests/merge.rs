use std::fs;
use std::path::PathBuf;

use polars::prelude::*;

use accidata::analysis::{dataframe_to_matrix, PcaAnalysisBuilder};
use accidata::merge::{MergePipeline, MergeReport};
use accidata::model::DecisionTreeBuilder;


// Two accidents, three vehicles, five victims.
// Victim 1 005 references a vehicle that no vehicle row carries,
// so the first join drops it.
const USAGERS_CSV: &str = "\
Num_Acc;id_usager;id_vehicule;num_veh;place;catu;grav;sexe;an_nais;trajet;secu1;secu2;secu3;locp;actp;etatp
202300000001;1 001;155000001;A01;1;1;1;1;1990;5;1;0;-1;0;0;-1
202300000001;1 002;155000001;A01;2;2;3;2;;0;1;-1;-1;0;A;1
202300000001;1 003;155000002;B01;1;1;4;1;1955;9;2;-1;-1;2;-1;2
202300000002;1 004;155000003;A01;1;1;2;2;2001;1;1;0;-1;0;0;-1
202300000002;1 005;155000099;Z99;3;3;1;1;1980;4;8;-1;-1;1;1;3
";


const VEHICULES_CSV: &str = "\
Num_Acc;id_vehicule;num_veh;senc;catv;obs;obsm;choc;manv;motor;occutc
202300000001;155000001;A01;1;7;0;2;1;1;1;0
202300000001;155000002;B01;2;33;0;1;3;2;5;0
202300000002;155000003;A01;1;10;6;0;8;15;1;0
";


const LIEUX_CSV: &str = "\
Num_Acc;catr;voie;v1;v2;circ;nbv;vosp;prof;pr;pr1;plan;lartpc;larrout;surf;infra;situ;vma
202300000001;3;AVENUE DES ARTS;1;B;2;2;0;1;5;100;1;0;5,25;1;0;1;50
202300000002;1;A6;0;C;1;#ERREUR;0;1;12;450;2;0;6,00;1;3;1;110
";


const CARCTERISTIQUES_CSV: &str = "\
Accident_Id;jour;mois;an;hrmn;lum;dep;com;agg;int;atm;col;adr;lat;long
202300000001;15;6;2023;1437;1;75;75056;2;1;1;3;12 RUE DE LA PAIX;48,8566;2,3522
202300000002;16;6;2023;0005;5;13;13001;1;1;1;2;ROUTE DE MARSEILLE;43,2965;5,3698
";


/// Write the four source tables of year 2023 into a scratch data
/// directory, unique per test so parallel tests never collide.
fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("accidata-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let year_dir = dir.join("2023");
    fs::create_dir_all(&year_dir).unwrap();

    fs::write(year_dir.join("usagers-2023.csv"), USAGERS_CSV).unwrap();
    fs::write(year_dir.join("vehicules-2023.csv"), VEHICULES_CSV).unwrap();
    fs::write(year_dir.join("lieux-2023.csv"), LIEUX_CSV).unwrap();
    fs::write(
        year_dir.join("carcteristiques-2023.csv"),
        CARCTERISTIQUES_CSV,
    ).unwrap();

    dir
}


#[test]
fn merging_flattens_the_year_into_one_row_per_victim() {
    let dir = fixture_dir("merge-flat");

    let merged = MergePipeline::new(2023)
        .data_dir(&dir)
        .run()
        .unwrap();
    println!("{merged}");

    // Four of the five victims have a matching vehicle.
    assert_eq!(merged.height(), 4);

    // The vehicle key was only needed for the first join.
    assert!(!merged.get_column_names().contains(&"id_vehicule"));
    assert!(merged.get_column_names().contains(&"Num_Acc"));

    // One flat row carries victim, vehicle, location and
    // circumstance columns side by side.
    for column in ["grav", "age", "catv", "larrout", "nbv", "hrmn", "dep"] {
        assert!(merged.get_column_names().contains(&column));
    }
}


#[test]
fn merged_rows_carry_the_values_of_their_accident() {
    let dir = fixture_dir("merge-values");

    let merged = MergePipeline::new(2023).data_dir(&dir).run().unwrap();

    let acc = merged.column("Num_Acc").unwrap().i64().unwrap();
    let larrout = merged.column("larrout").unwrap().i16().unwrap();

    let mut seen = 0;
    for (acc, larrout) in acc.into_no_null_iter()
        .zip(larrout.into_no_null_iter())
    {
        let expected = match acc {
            202_300_000_001 => 525,
            202_300_000_002 => 600,
            other => panic!("unexpected accident id {other}"),
        };
        assert_eq!(larrout, expected);
        seen += 1;
    }
    assert_eq!(seen, 4);
}


#[test]
fn the_report_accounts_for_every_dropped_row() {
    let dir = fixture_dir("merge-report");

    let (merged, report) = MergePipeline::new(2023)
        .data_dir(&dir)
        .run_with_report()
        .unwrap();

    assert_eq!(report.year, 2023);
    assert_eq!(report.table_rows.usagers, 5);
    assert_eq!(report.table_rows.vehicules, 3);
    assert_eq!(report.table_rows.lieux, 2);
    assert_eq!(report.table_rows.carcteristiques, 2);

    assert_eq!(report.joins.len(), 3);
    assert_eq!(report.joins[0].table, "vehicules");
    assert_eq!(report.joins[0].rows_before, 5);
    assert_eq!(report.joins[0].rows_after, 4);
    assert_eq!(report.joins[0].rows_dropped, 1);
    assert_eq!(report.joins[1].table, "lieux");
    assert_eq!(report.joins[1].rows_dropped, 0);
    assert_eq!(report.joins[2].table, "carcteristiques");
    assert_eq!(report.joins[2].rows_dropped, 0);

    assert_eq!(report.merged_rows, merged.height());
    assert_eq!(report.total_rows_dropped(), 1);
}


#[test]
fn merging_twice_yields_the_same_table() {
    let dir = fixture_dir("merge-idempotent");

    let pipeline = MergePipeline::new(2023).data_dir(&dir);
    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();

    assert!(first.frame_equal(&second));
}


#[test]
fn persisting_writes_the_snapshot_and_the_report() {
    let dir = fixture_dir("merge-persist");

    let (merged, report) = MergePipeline::new(2023)
        .data_dir(&dir)
        .persist(true)
        .run_with_report()
        .unwrap();

    let table_path = dir.join("2023").join("merged-data-2023.ipc");
    let report_path = dir.join("2023").join("merge-report-2023.json");
    assert!(table_path.exists());
    assert!(report_path.exists());

    // The report on disk is the report returned.
    let encoded = fs::read_to_string(&report_path).unwrap();
    let decoded: MergeReport = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, report);
    assert_eq!(decoded.merged_rows, merged.height());
}


#[test]
fn a_merged_year_feeds_the_analyzer() {
    let dir = fixture_dir("merge-analysis");

    let merged = MergePipeline::new(2023).data_dir(&dir).run().unwrap();

    // The accident id is a key, not a feature.
    let features_df = merged.drop("Num_Acc").unwrap();
    let (features, labels) = dataframe_to_matrix(&features_df, "grav")
        .unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(labels.len(), 4);

    let analysis = PcaAnalysisBuilder::new(&features, &labels)
        .classifier(|| DecisionTreeBuilder::new().build())
        .data_name("accidents-2023")
        .build()
        .unwrap();

    assert!((0.0..=1.0).contains(&analysis.baseline_accuracy()));

    let series = analysis.accuracy_vs_components(Some(4));
    assert_eq!(series.len(), 3);
    assert!(series.iter().all(|a| (0.0..=1.0).contains(a)));
}
