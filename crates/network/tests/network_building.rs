use approx::assert_relative_eq;
use network::{NetworkError, ReactorNetwork};
use reactor_domain::{InletSource, Outlet};

#[test]
fn ids_are_sequential_and_rollback_decrements() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("a", 1.0, 100.0, 2.0).expect("add r1");
  let r2 = net.add_reactor("b", 2.0, 200.0, 2.0).expect("add r2");
  assert_eq!((r1, r2), (1, 2));

  // rollback removes the most recent and frees its id for reuse
  let removed = net.remove_last_reactor().expect("rollback");
  assert_eq!(removed, 2);
  let r2_again = net.add_reactor("c", 3.0, 300.0, 2.0).expect("re-add");
  assert_eq!(r2_again, 2);

  let s1 = net.add_syringe("acid", 5.0).expect("add s1");
  assert_eq!(s1, 1);
  assert_eq!(net.remove_last_syringe().expect("rollback syringe"), 1);
}

#[test]
fn rollback_on_empty_collections_is_not_found() {
  let mut net = ReactorNetwork::new();
  assert!(matches!(net.remove_last_reactor(), Err(NetworkError::NotFound(_))));
  assert!(matches!(net.remove_last_syringe(), Err(NetworkError::NotFound(_))));
}

#[test]
fn reactor_creation_resolves_missing_dimension() {
  let mut net = ReactorNetwork::new();
  let id = net.add_reactor("tube", 0.0, 1000.0, 1.0).expect("add");
  let r = net.reactor(id).expect("lookup");
  assert!(r.volume_ml() > 0.0);
  // two unknowns are rejected and nothing is stored
  assert!(net.add_reactor("bad", 1.0, 0.0, 0.0).is_err());
  assert_eq!(net.reactors().len(), 1);
}

#[test]
fn connect_syringe_records_edge_on_both_sides() {
  let mut net = ReactorNetwork::new();
  let r = net.add_reactor("r", 1.0, 100.0, 2.0).unwrap();
  let s = net.add_syringe("acid", 5.0).unwrap();
  net.connect_syringe(s, r).expect("connect");

  assert_eq!(net.syringe(s).unwrap().connected_to(), Some(r));
  assert_eq!(net.reactor(r).unwrap().inputs(), &[InletSource::Syringe(s)]);
}

#[test]
fn connect_syringe_rejections_leave_graph_unchanged() {
  let mut net = ReactorNetwork::new();
  let r = net.add_reactor("r", 1.0, 100.0, 2.0).unwrap();
  let s = net.add_syringe("acid", 5.0).unwrap();
  net.connect_syringe(s, r).unwrap();
  let hash = net.state_hash();

  // unknown ids
  assert!(matches!(net.connect_syringe(99, r), Err(NetworkError::UnknownSyringe(99))));
  assert!(matches!(net.connect_syringe(s, 99), Err(NetworkError::UnknownReactor(99))));
  // second connection attempt is rejected, not overwritten
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  assert!(matches!(net.connect_syringe(s, r2), Err(NetworkError::AlreadyConnected(_))));
  assert_eq!(net.syringe(s).unwrap().connected_to(), Some(r));

  // remove the extra reactor again: the original state must be intact
  net.remove_last_reactor().unwrap();
  assert_eq!(net.state_hash(), hash);
}

#[test]
fn self_loop_is_rejected() {
  let mut net = ReactorNetwork::new();
  let r = net.add_reactor("r", 1.0, 100.0, 2.0).unwrap();
  assert!(matches!(net.connect_reactor_output(r, Outlet::Reactor(r)), Err(NetworkError::SelfLoop(_))));
  assert!(net.reactor(r).unwrap().output().is_none());
}

#[test]
fn only_one_product_sink_in_the_network() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("r1", 1.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  net.connect_reactor_output(r1, Outlet::Product).expect("first product");
  assert_eq!(net.product_sink_owner(), Some(r1));

  let hash = net.state_hash();
  match net.connect_reactor_output(r2, Outlet::Product) {
    Err(NetworkError::DuplicateProductSink(owner)) => assert_eq!(owner, r1),
    other => panic!("expected DuplicateProductSink, got {:?}", other),
  }
  assert_eq!(net.state_hash(), hash);
}

#[test]
fn reactor_output_is_set_exactly_once() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("r1", 1.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  net.connect_reactor_output(r1, Outlet::Reactor(r2)).unwrap();
  assert!(matches!(net.connect_reactor_output(r1, Outlet::Product), Err(NetworkError::AlreadyConnected(_))));
  assert_eq!(net.reactor(r1).unwrap().output(), Some(Outlet::Reactor(r2)));
}

#[test]
fn closing_a_cycle_is_rejected() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("r1", 1.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  // direct back edge: r1 -> r2 exists, r2 -> r1 must fail
  net.connect_reactor_output(r1, Outlet::Reactor(r2)).unwrap();
  let hash = net.state_hash();
  match net.connect_reactor_output(r2, Outlet::Reactor(r1)) {
    Err(NetworkError::CycleDetected { from, to }) => {
      assert_eq!((from, to), (r2, r1));
    }
    other => panic!("expected CycleDetected, got {:?}", other),
  }
  assert_eq!(net.state_hash(), hash);
}

#[test]
fn transitive_cycles_are_detected() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("r1", 1.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  let r3 = net.add_reactor("r3", 1.0, 100.0, 2.0).unwrap();
  net.connect_reactor_output(r1, Outlet::Reactor(r2)).unwrap();
  net.connect_reactor_output(r2, Outlet::Reactor(r3)).unwrap();
  assert!(matches!(net.connect_reactor_output(r3, Outlet::Reactor(r1)),
                   Err(NetworkError::CycleDetected { .. })));
  // a forward edge into a fresh reactor is still fine
  let r4 = net.add_reactor("r4", 1.0, 100.0, 2.0).unwrap();
  net.connect_reactor_output(r3, Outlet::Reactor(r4)).expect("valid edge");
}

#[test]
fn rollback_purges_edges_referencing_the_removed_reactor() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("r1", 1.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("r2", 1.0, 100.0, 2.0).unwrap();
  let s = net.add_syringe("acid", 5.0).unwrap();
  net.connect_syringe(s, r2).unwrap();
  net.connect_reactor_output(r1, Outlet::Reactor(r2)).unwrap();

  net.remove_last_reactor().expect("rollback r2");

  // no dangling references remain
  assert_eq!(net.syringe(s).unwrap().connected_to(), None);
  assert!(net.reactor(r1).unwrap().output().is_none());
  // the syringe can connect again now
  net.connect_syringe(s, r1).expect("reconnect");
}

#[test]
fn rollback_purges_input_edges_of_the_removed_syringe() {
  let mut net = ReactorNetwork::new();
  let r = net.add_reactor("r", 1.0, 100.0, 2.0).unwrap();
  let s = net.add_syringe("acid", 5.0).unwrap();
  net.connect_syringe(s, r).unwrap();
  net.remove_last_syringe().expect("rollback");
  assert!(net.reactor(r).unwrap().inputs().is_empty());
}

#[test]
fn total_volume_sums_reactors_and_tubes() {
  let mut net = ReactorNetwork::new();
  net.add_reactor("r1", 2.0, 100.0, 2.0).unwrap();
  net.add_reactor("r2", 3.0, 100.0, 2.0).unwrap();
  assert_eq!(net.total_volume_ml(), 5.0);

  let added = net.add_tube_volume(0.5, 0.0, 0.0).expect("declared volume");
  assert_eq!(added, 0.5);
  assert_eq!(net.total_volume_ml(), 5.5);

  // resolved from length and diameter when the volume is the unknown
  let resolved = net.add_tube_volume(0.0, 1000.0, 1.0).expect("resolved volume");
  assert!(resolved > 0.0);
  assert_relative_eq!(net.total_volume_ml(), 5.5 + resolved, max_relative = 1e-12);

  // removing more than was declared is rejected and changes nothing
  let before = net.tube_volume_ml();
  assert!(net.remove_tube_volume(before + 1.0, 0.0, 0.0).is_err());
  assert_eq!(net.tube_volume_ml(), before);
  net.remove_tube_volume(resolved, 0.0, 0.0).expect("remove tube");
  assert_relative_eq!(net.tube_volume_ml(), 0.5, max_relative = 1e-12);
}

#[test]
fn validate_complete_reports_each_missing_piece() {
  let mut net = ReactorNetwork::new();
  assert!(matches!(net.validate_complete(), Err(NetworkError::IncompleteNetwork(_))));

  let r = net.add_reactor("r", 1.0, 100.0, 2.0).unwrap();
  assert!(matches!(net.validate_complete(), Err(NetworkError::IncompleteNetwork(_))));

  let s = net.add_syringe("acid", 5.0).unwrap();
  // syringe still unconnected
  assert!(matches!(net.validate_complete(), Err(NetworkError::IncompleteNetwork(_))));

  net.connect_syringe(s, r).unwrap();
  // reactor has no output yet
  assert!(matches!(net.validate_complete(), Err(NetworkError::IncompleteNetwork(_))));

  net.connect_reactor_output(r, Outlet::Product).unwrap();
  net.validate_complete().expect("complete network");
}

#[test]
fn report_exposes_the_plain_data_contract() {
  let mut net = ReactorNetwork::new();
  let r1 = net.add_reactor("oxidation", 6.0, 100.0, 2.0).unwrap();
  let r2 = net.add_reactor("quench", 4.0, 100.0, 2.0).unwrap();
  let s1 = net.add_syringe("acid", 5.0).unwrap();
  let s2 = net.add_syringe("base", 5.0).unwrap();
  net.connect_syringe(s1, r1).unwrap();
  net.connect_syringe(s2, r2).unwrap();
  net.connect_reactor_output(r1, Outlet::Reactor(r2)).unwrap();
  net.connect_reactor_output(r2, Outlet::Product).unwrap();

  // before any rates are set the retention time is simply absent
  let report = net.report();
  assert_eq!(report.setup_id, net.id());
  assert_eq!(report.total_volume_ml, 10.0);
  assert!(report.retention_time_min.is_none());
  assert_eq!(report.reactors.len(), 2);
  assert_eq!(report.syringes.len(), 2);
  assert_eq!(report.reactors[1].inputs.len(), 2); // syringe + reactor edge
  assert_eq!(report.reactors[1].output, Some(Outlet::Product));

  net.compute_flow_rates(10.0, 5.0).expect("rates");
  let report = net.report();
  let t = report.retention_time_min.expect("retention present");
  assert!((t - 5.0).abs() < 1e-9);

  // the report serializes as plain data
  let value = report.to_value();
  assert_eq!(value["total_volume_ml"], 10.0);
  assert_eq!(value["syringes"].as_array().unwrap().len(), 2);
}
