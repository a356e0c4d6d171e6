//! Sample messages shared by the integration tests.

use hl7tmpl::{MessageTree, Segment, parse_message};

/// An admission with one patient, one next of kin and three insurances.
pub const ADT_A01: &str = "MSH|^~\\&|ADT|HOSP|EHR|HOSP|20240101120000||ADT^A01|MSG0001|P|2.5.1\r\
EVN|A01|20240101120000\r\
PID|1||12345^^^MRN~999-99-9999^^^SSN||DOE^JANE||19800101|F\r\
NK1|1|DOE^JOHN|SPO\r\
PV1|1|I|WARD^101^A\r\
IN1|1|PLAN1|INS1\r\
IN1|2|PLAN2|INS2\r\
IN1|3|PLAN3|INS3\r";

/// Lab results: three orders; the second has five results.
///
/// Positions: 0 MSH, 1 PID, 2 PV1, 3 ORC, 4 OBR|1, 5-6 OBX, 7 NTE, 8 ORC,
/// 9 OBR|2, 10-12 OBX, 13 NTE, 14-15 OBX, 16 OBR|3, 17 OBX, 18 SPM.
pub const LAB_ORU: &str = "MSH|^~\\&|LAB|HOSP|EHR|HOSP|20240101120000||ORU^R01|MSG0002|P|2.5.1\r\
PID|1||12345^^^MRN||DOE^JANE\r\
PV1|1|O\r\
ORC|RE|ORD1\r\
OBR|1|ORD1||CBC^Complete blood count\r\
OBX|1|NM|WBC||6.1\r\
OBX|2|NM|RBC||4.5\r\
NTE|1||first order comment\r\
ORC|RE|ORD2\r\
OBR|2|ORD2||CMP^Metabolic panel\r\
OBX|1|NM|NA||140\r\
OBX|2|NM|K||4.1\r\
OBX|3|NM|CL||101\r\
NTE|1||chloride note\r\
OBX|4|NM|CO2||24\r\
OBX|5|NM|BUN||12\r\
OBR|3|ORD2||LIPID^Lipid panel\r\
OBX|1|NM|CHOL||180\r\
SPM|1|SPEC1\r";

pub fn adt() -> MessageTree {
    parse_message(ADT_A01).unwrap()
}

pub fn lab() -> MessageTree {
    parse_message(LAB_ORU).unwrap()
}

/// A tree of field-less segments at positions 0, 1, 2, ...
pub fn tree_of(names: &[&str]) -> MessageTree {
    let segments = names
        .iter()
        .enumerate()
        .map(|(position, name)| Segment::builder().name(*name).position(position).build())
        .collect();
    MessageTree::new(segments).unwrap()
}

pub fn positions(segments: &[&Segment]) -> Vec<usize> {
    segments.iter().map(|segment| segment.position).collect()
}
