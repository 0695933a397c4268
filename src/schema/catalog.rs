//! CGMES 2.4.15 classes known to this crate.
//!
//! A hand-maintained subset of the schema covering the equipment,
//! topology, state-variable, diagram and location classes most grid
//! models use. Inverse association ends are kept (they are rebuilt on
//! read) but marked unused so they are never written.
use once_cell::sync::Lazy;

use super::{AttributeInfo as A, ClassInfo, Namespace, Schema};
use crate::profile::Profile::{self, DL, DY, EQ, EQBD, GL, SSH, SV, TP, TPBD};

pub static CGMES: Lazy<Schema> = Lazy::new(|| {
    Schema::new(&CLASSES, "IdentifiedObject").expect("built-in CGMES catalogue is consistent")
});

const IDENTIFIED_OBJECT: &[A] = &[
    A::primitive("mRID", &[EQ, DL, DY, EQBD, GL, SSH, TP, TPBD]),
    A::primitive("name", &[EQ, DL, DY, EQBD, GL, TP, TPBD]),
    A::primitive("description", &[EQ, DL, DY, EQBD, GL, TP, TPBD]),
    A::primitive("shortName", &[EQ, EQBD, TP, TPBD]).namespace(Namespace::Entsoe),
    A::primitive("energyIdentCodeEic", &[EQ, EQBD, TP, TPBD]).namespace(Namespace::Entsoe),
    A::list("DiagramObjects", "DiagramObject", &[DL])
        .unused()
        .inverse("IdentifiedObject"),
];

const POWER_SYSTEM_RESOURCE: &[A] = &[A::reference("Location", "Location", &[GL])
    .unused()
    .inverse("PowerSystemResources")];

const EQUIPMENT: &[A] = &[
    A::primitive("aggregate", &[EQ]),
    A::reference("EquipmentContainer", "EquipmentContainer", &[EQ, EQBD]).inverse("Equipments"),
];

const CONDUCTING_EQUIPMENT: &[A] = &[
    A::reference("BaseVoltage", "BaseVoltage", &[EQ]).inverse("ConductingEquipment"),
    A::list("Terminals", "Terminal", &[DY, EQ])
        .unused()
        .inverse("ConductingEquipment"),
    A::reference("SvStatus", "SvStatus", &[SV])
        .unused()
        .inverse("ConductingEquipment"),
];

const CONDUCTOR: &[A] = &[A::primitive("length", &[EQ])];

const AC_LINE_SEGMENT: &[A] = &[
    A::primitive("bch", &[EQ]),
    A::primitive("gch", &[EQ]),
    A::primitive("r", &[EQ]),
    A::primitive("x", &[EQ]),
    A::primitive("shortCircuitEndTemperature", &[EQ]),
];

const ENERGY_CONSUMER: &[A] = &[
    A::primitive("pfixed", &[EQ]),
    A::primitive("qfixed", &[EQ]),
    A::primitive("p", &[SSH]),
    A::primitive("q", &[SSH]),
];

const AC_DC_TERMINAL: &[A] = &[
    A::primitive("sequenceNumber", &[EQ, EQBD]),
    A::primitive("connected", &[SSH]),
];

const TERMINAL: &[A] = &[
    A::reference("ConductingEquipment", "ConductingEquipment", &[DY, EQ]).inverse("Terminals"),
    A::reference("ConnectivityNode", "ConnectivityNode", &[EQ]).inverse("Terminals"),
    A::reference("TopologicalNode", "TopologicalNode", &[TP]).inverse("Terminal"),
    A::enumeration("phases", "PhaseCode", &[EQ]),
    A::reference("SvPowerFlow", "SvPowerFlow", &[SV])
        .unused()
        .inverse("Terminal"),
];

const CONNECTIVITY_NODE: &[A] = &[
    A::reference("ConnectivityNodeContainer", "ConnectivityNodeContainer", &[EQ, EQBD])
        .inverse("ConnectivityNodes"),
    A::list("Terminals", "Terminal", &[EQ])
        .unused()
        .inverse("ConnectivityNode"),
    A::reference("TopologicalNode", "TopologicalNode", &[TP, TPBD]).inverse("ConnectivityNodes"),
    A::primitive("boundaryPoint", &[EQBD]).namespace(Namespace::Entsoe),
];

const TOPOLOGICAL_NODE: &[A] = &[
    A::reference("BaseVoltage", "BaseVoltage", &[TP, TPBD]).inverse("TopologicalNode"),
    A::reference("ConnectivityNodeContainer", "ConnectivityNodeContainer", &[TP, TPBD])
        .inverse("TopologicalNode"),
    A::list("ConnectivityNodes", "ConnectivityNode", &[TP])
        .unused()
        .inverse("TopologicalNode"),
    A::list("Terminal", "Terminal", &[TP])
        .unused()
        .inverse("TopologicalNode"),
    A::reference("SvVoltage", "SvVoltage", &[SV])
        .unused()
        .inverse("TopologicalNode"),
    A::primitive("boundaryPoint", &[TPBD]).namespace(Namespace::Entsoe),
    A::primitive("fromEndName", &[TPBD]).namespace(Namespace::Entsoe),
    A::primitive("toEndName", &[TPBD]).namespace(Namespace::Entsoe),
];

const BASE_VOLTAGE: &[A] = &[
    A::primitive("nominalVoltage", &[EQ, EQBD]),
    A::list("ConductingEquipment", "ConductingEquipment", &[EQ])
        .unused()
        .inverse("BaseVoltage"),
    A::list("TopologicalNode", "TopologicalNode", &[TP])
        .unused()
        .inverse("BaseVoltage"),
    A::list("VoltageLevel", "VoltageLevel", &[EQ])
        .unused()
        .inverse("BaseVoltage"),
];

const CONNECTIVITY_NODE_CONTAINER: &[A] = &[
    A::list("ConnectivityNodes", "ConnectivityNode", &[EQ, EQBD])
        .unused()
        .inverse("ConnectivityNodeContainer"),
    A::list("TopologicalNode", "TopologicalNode", &[TP, TPBD])
        .unused()
        .inverse("ConnectivityNodeContainer"),
];

const EQUIPMENT_CONTAINER: &[A] = &[A::list("Equipments", "Equipment", &[EQ, EQBD])
    .unused()
    .inverse("EquipmentContainer")];

const SUBSTATION: &[A] = &[A::list("VoltageLevels", "VoltageLevel", &[EQ])
    .unused()
    .inverse("Substation")];

const VOLTAGE_LEVEL: &[A] = &[
    A::reference("BaseVoltage", "BaseVoltage", &[EQ]).inverse("VoltageLevel"),
    A::reference("Substation", "Substation", &[EQ]).inverse("VoltageLevels"),
    A::primitive("highVoltageLimit", &[EQ]),
    A::primitive("lowVoltageLimit", &[EQ]),
];

const REGULATING_CONTROL: &[A] = &[
    A::enumeration("mode", "RegulatingControlModeKind", &[EQ]),
    A::reference("Terminal", "Terminal", &[EQ]),
    A::primitive("discrete", &[SSH]),
    A::primitive("enabled", &[SSH]),
    A::primitive("targetDeadband", &[SSH]),
    A::primitive("targetValue", &[SSH]),
    A::enumeration("targetValueUnitMultiplier", "UnitMultiplier", &[SSH]),
];

const SV_VOLTAGE: &[A] = &[
    A::primitive("angle", &[SV]),
    A::primitive("v", &[SV]),
    A::reference("TopologicalNode", "TopologicalNode", &[SV]).inverse("SvVoltage"),
];

const SV_STATUS: &[A] = &[
    A::primitive("inService", &[SV]),
    A::reference("ConductingEquipment", "ConductingEquipment", &[SV]).inverse("SvStatus"),
];

const SV_POWER_FLOW: &[A] = &[
    A::primitive("p", &[SV]),
    A::primitive("q", &[SV]),
    A::reference("Terminal", "Terminal", &[SV]).inverse("SvPowerFlow"),
];

const LOCATION: &[A] = &[
    A::reference("PowerSystemResources", "PowerSystemResource", &[GL]).inverse("Location"),
];

const DIAGRAM_OBJECT: &[A] = &[
    A::reference("IdentifiedObject", "IdentifiedObject", &[DL]).inverse("DiagramObjects"),
    A::primitive("drawingOrder", &[DL]),
    A::primitive("rotation", &[DL]),
];

const ALL_IDENTIFIED: &[Profile] = &[EQ, DL, DY, EQBD, GL, SSH, TP, TPBD];

static CLASSES: [ClassInfo; 23] = [
    ClassInfo::new("IdentifiedObject", None, ALL_IDENTIFIED, EQ, IDENTIFIED_OBJECT),
    ClassInfo::new(
        "PowerSystemResource",
        Some("IdentifiedObject"),
        &[EQ, DL, DY, EQBD, GL, SSH, TP],
        EQ,
        POWER_SYSTEM_RESOURCE,
    ),
    ClassInfo::new("Equipment", Some("PowerSystemResource"), &[EQ, DY, SSH], EQ, EQUIPMENT),
    ClassInfo::new(
        "ConductingEquipment",
        Some("Equipment"),
        &[DY, EQ, SSH, SV],
        EQ,
        CONDUCTING_EQUIPMENT,
    ),
    ClassInfo::new("Conductor", Some("ConductingEquipment"), &[EQ], EQ, CONDUCTOR),
    ClassInfo::new("ACLineSegment", Some("Conductor"), &[EQ], EQ, AC_LINE_SEGMENT),
    ClassInfo::new(
        "EnergyConsumer",
        Some("ConductingEquipment"),
        &[DY, EQ, SSH],
        EQ,
        ENERGY_CONSUMER,
    ),
    ClassInfo::new("ACDCTerminal", Some("IdentifiedObject"), &[EQ, EQBD, SSH], EQ, AC_DC_TERMINAL),
    ClassInfo::new("Terminal", Some("ACDCTerminal"), &[DY, EQ, SSH, SV, TP], EQ, TERMINAL),
    ClassInfo::new(
        "ConnectivityNode",
        Some("IdentifiedObject"),
        &[EQ, EQBD, TP, TPBD],
        EQ,
        CONNECTIVITY_NODE,
    ),
    ClassInfo::new(
        "TopologicalNode",
        Some("IdentifiedObject"),
        &[SV, TP, TPBD],
        TP,
        TOPOLOGICAL_NODE,
    ),
    ClassInfo::new("BaseVoltage", Some("IdentifiedObject"), &[EQ, EQBD, TP], EQ, BASE_VOLTAGE),
    ClassInfo::new(
        "ConnectivityNodeContainer",
        Some("PowerSystemResource"),
        &[EQ, EQBD, TP, TPBD],
        EQ,
        CONNECTIVITY_NODE_CONTAINER,
    ),
    ClassInfo::new(
        "EquipmentContainer",
        Some("ConnectivityNodeContainer"),
        &[EQ, EQBD],
        EQ,
        EQUIPMENT_CONTAINER,
    ),
    ClassInfo::new("Substation", Some("EquipmentContainer"), &[EQ], EQ, SUBSTATION),
    ClassInfo::new("VoltageLevel", Some("EquipmentContainer"), &[EQ], EQ, VOLTAGE_LEVEL),
    ClassInfo::new(
        "RegulatingControl",
        Some("PowerSystemResource"),
        &[EQ, SSH],
        EQ,
        REGULATING_CONTROL,
    ),
    ClassInfo::new("SvVoltage", None, &[SV], SV, SV_VOLTAGE),
    ClassInfo::new("SvStatus", None, &[SV], SV, SV_STATUS),
    ClassInfo::new("SvPowerFlow", None, &[SV], SV, SV_POWER_FLOW),
    ClassInfo::new("Location", Some("IdentifiedObject"), &[GL], GL, LOCATION),
    ClassInfo::new("DiagramObject", Some("IdentifiedObject"), &[DL], DL, DIAGRAM_OBJECT),
    ClassInfo::new(
        "GeographicalRegion",
        Some("IdentifiedObject"),
        &[EQ, EQBD],
        EQ,
        &[],
    ),
];
