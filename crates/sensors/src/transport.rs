//! Kind-erased transport helpers
//!
//! The coordinating side ships a suite's records as payloads; the receiving side
//! routes each payload by its header. [`verify_payload`] decodes a payload and checks
//! it re-encodes to the same bytes as the suite's record, which compares floats bit
//! for bit (NaN included).

use bytes::Bytes;
use contracts::{CodecError, RecordType, SensorKind, WireRecord};

use crate::registry::{dispatch, KindVisitor, RegisteredSensor, SensorSuite};
use crate::wire::{self, Header};

/// A payload together with the header it was encoded with
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub header: Header,
    pub payload: Bytes,
}

/// Encode the Spec, Params and Results of one kind
pub fn encode_kind(suite: &SensorSuite, kind: SensorKind) -> Result<Vec<Envelope>, CodecError> {
    struct Encode<'a>(&'a SensorSuite);

    impl KindVisitor for Encode<'_> {
        type Output = Result<Vec<Envelope>, CodecError>;

        fn visit<M: RegisteredSensor>(&mut self) -> Self::Output {
            let records = M::records(self.0);
            Ok(vec![
                envelope::<M::Spec>(wire::encode(&records.spec)?),
                envelope::<M::Params>(wire::encode(&records.params)?),
                envelope::<M::Results>(wire::encode(&records.results)?),
            ])
        }
    }

    dispatch(kind, &mut Encode(suite))
}

/// Encode every record of every enabled kind
pub fn encode_suite(suite: &SensorSuite) -> Result<Vec<Envelope>, CodecError> {
    let mut envelopes = Vec::new();
    for &kind in &suite.enabled {
        envelopes.extend(encode_kind(suite, kind)?);
    }
    Ok(envelopes)
}

/// Decode `payload` by its header and compare it with the suite's record
///
/// Returns the header and whether the decoded record matches.
pub fn verify_payload(suite: &SensorSuite, payload: &[u8]) -> Result<(Header, bool), CodecError> {
    struct Verify<'a> {
        suite: &'a SensorSuite,
        record: RecordType,
        payload: &'a [u8],
    }

    impl KindVisitor for Verify<'_> {
        type Output = Result<bool, CodecError>;

        fn visit<M: RegisteredSensor>(&mut self) -> Self::Output {
            let records = M::records(self.suite);
            match self.record {
                RecordType::Spec => same_record(&records.spec, self.payload),
                RecordType::Params => same_record(&records.params, self.payload),
                RecordType::Results => same_record(&records.results, self.payload),
            }
        }
    }

    let header = Header::parse(payload)?;
    let matches = dispatch(
        header.kind,
        &mut Verify {
            suite,
            record: header.record,
            payload,
        },
    )?;
    Ok((header, matches))
}

fn envelope<R: WireRecord>(payload: Bytes) -> Envelope {
    Envelope {
        header: Header::of::<R>(),
        payload,
    }
}

fn same_record<R: WireRecord>(expected: &R, payload: &[u8]) -> Result<bool, CodecError> {
    let decoded = wire::decode::<R>(payload)?;
    Ok(wire::encode(&decoded)? == wire::encode(expected)?)
}
