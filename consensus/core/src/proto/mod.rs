//!
//! Protobuf wire schema of a transaction. Field numbers are consensus
//! critical: the pre-image and final hashes are computed over these bytes.
//!

mod convert;

pub use convert::*;

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoTransaction {
    #[prost(uint64, optional, tag = "1")]
    pub r#type: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub to: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "3")]
    pub nonce: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub value: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "5")]
    pub gas: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "6")]
    pub data: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "7")]
    pub chain_id: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "8")]
    pub gas_fee_cap: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "9")]
    pub gas_tip_cap: Option<Vec<u8>>,
    #[prost(message, optional, tag = "10")]
    pub access_list: Option<ProtoAccessList>,
    #[prost(uint64, optional, tag = "11")]
    pub etx_gas_limit: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "12")]
    pub etx_gas_price: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "13")]
    pub etx_gas_tip: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "14")]
    pub etx_data: Option<Vec<u8>>,
    #[prost(message, optional, tag = "15")]
    pub etx_access_list: Option<ProtoAccessList>,
    #[prost(bytes = "vec", optional, tag = "16")]
    pub v: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "17")]
    pub r: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "18")]
    pub s: Option<Vec<u8>>,
    #[prost(message, optional, tag = "21")]
    pub tx_ins: Option<ProtoTxIns>,
    #[prost(message, optional, tag = "22")]
    pub tx_outs: Option<ProtoTxOuts>,
    #[prost(bytes = "vec", optional, tag = "23")]
    pub signature: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoAccessList {
    #[prost(message, repeated, tag = "1")]
    pub access_tuples: Vec<ProtoAccessTuple>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoAccessTuple {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub storage_key: Vec<ProtoHash>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoHash {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoTxIns {
    #[prost(message, repeated, tag = "1")]
    pub tx_ins: Vec<ProtoTxIn>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoTxIn {
    #[prost(message, optional, tag = "1")]
    pub previous_out_point: Option<ProtoOutPoint>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub address: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoOutPoint {
    #[prost(message, optional, tag = "1")]
    pub hash: Option<ProtoHash>,
    #[prost(uint32, optional, tag = "2")]
    pub index: Option<u32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoTxOuts {
    #[prost(message, repeated, tag = "1")]
    pub tx_outs: Vec<ProtoTxOut>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProtoTxOut {
    #[prost(uint32, optional, tag = "1")]
    pub denomination: Option<u32>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub address: Option<Vec<u8>>,
}
