use std::{env::current_dir, fs::create_dir_all};

use arena_brackets::{
    msg::{MatchResultMsg, TournamentConfig},
    state::{BracketInstance, Participant},
    topology::BracketTopology,
};
use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(Participant), &out_dir);
    export_schema(&schema_for!(TournamentConfig), &out_dir);
    export_schema(&schema_for!(MatchResultMsg), &out_dir);
    export_schema(&schema_for!(BracketInstance), &out_dir);
    export_schema(&schema_for!(BracketTopology), &out_dir);
}
