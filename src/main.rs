use network::{ReactorNetwork, SetupReport};
use reactor_domain::{resolve_dimension, Outlet};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use std::io::{self, Write};

/// Menú interactivo para armar una red de reactores y jeringas sobre el
/// core (`reactor-domain` + `network`). Toda la entrada/salida de texto
/// vive acá; el core sólo recibe valores ya parseados y entrega datos.
///
/// Opciones soportadas:
/// 1) Resolver una dimensión de cilindro suelta (sin red)
/// 2) Agregar reactor / 3) Agregar jeringa / 4) Deshacer el último
/// 5) Conectar jeringa a reactor
/// 6) Conectar salida de reactor (otro reactor o PRODUCT)
/// 7) Declarar o quitar volumen de tubos conectores
/// 8) Calcular caudales para un tiempo de retención
/// 9) Fijar caudales a mano y calcular el tiempo de retención
/// 10) Ver el reporte del setup (tabla o JSON)
/// 11) Salir
fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let level = match std::env::var("FLOWSETUP_LOG").unwrap_or_default().to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let mut red = ReactorNetwork::new();
    log::info!("setup {} iniciado", red.id());

    loop {
        println!("\n== Setup de flujo continuo ==");
        println!("1) Resolver dimensión de cilindro (volumen/longitud/diámetro)");
        println!("2) Agregar reactor");
        println!("3) Agregar jeringa");
        println!("4) Deshacer el último reactor o jeringa");
        println!("5) Conectar jeringa a reactor");
        println!("6) Conectar salida de reactor");
        println!("7) Volumen de tubos conectores");
        println!("8) Calcular caudales (dando tiempo de retención)");
        println!("9) Calcular tiempo de retención (dando caudales)");
        println!("10) Ver reporte del setup");
        println!("11) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                println!("Dejar en 0 la dimensión a calcular.");
                let volumen = prompt_f64("Volumen [mL]: ")?;
                let longitud = prompt_f64("Longitud [mm]: ")?;
                let diametro = prompt_f64("Diámetro [mm]: ")?;
                match resolve_dimension(volumen, longitud, diametro) {
                    Ok(res) => println!("Resultado -> {}", res),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "2" => {
                let nombre = prompt("Nombre del reactor: ")?;
                println!("Una dimensión puede ser 0 para calcularla automáticamente.");
                let volumen = prompt_f64("Volumen [mL]: ")?;
                let longitud = prompt_f64("Longitud [mm]: ")?;
                let diametro = prompt_f64("Diámetro [mm]: ")?;
                match red.add_reactor(nombre.trim(), volumen, longitud, diametro) {
                    Ok(id) => println!("Reactor {} agregado.", id),
                    Err(e) => eprintln!("Error agregando reactor: {}", e),
                }
            }
            "3" => {
                let nombre = prompt("Nombre de la jeringa (p.ej. el reactivo): ")?;
                let volumen = prompt_f64("Volumen [mL]: ")?;
                match red.add_syringe(nombre.trim(), volumen) {
                    Ok(id) => println!("Jeringa {} agregada.", id),
                    Err(e) => eprintln!("Error agregando jeringa: {}", e),
                }
            }
            "4" => {
                let que = prompt("¿Deshacer (r)eactor o (j)eringa?: ")?;
                let res = match que.trim() {
                    "r" => red.remove_last_reactor(),
                    "j" => red.remove_last_syringe(),
                    other => {
                        eprintln!("Opción inválida: {}", other);
                        continue;
                    }
                };
                match res {
                    Ok(id) => println!("Elemento {} eliminado.", id),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "5" => {
                listar(&red);
                let jeringa = prompt_u32("Id de jeringa: ")?;
                let reactor = prompt_u32("Id de reactor destino: ")?;
                match red.connect_syringe(jeringa, reactor) {
                    Ok(()) => println!("Conectado."),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "6" => {
                listar(&red);
                let reactor = prompt_u32("Id de reactor origen: ")?;
                let destino = prompt("Destino (id de reactor, o 'p' para PRODUCT): ")?;
                let outlet = if destino.trim() == "p" {
                    Outlet::Product
                } else {
                    match destino.trim().parse::<u32>() {
                        Ok(id) => Outlet::Reactor(id),
                        Err(_) => {
                            eprintln!("Destino inválido");
                            continue;
                        }
                    }
                };
                match red.connect_reactor_output(reactor, outlet) {
                    Ok(()) => println!("Conectado."),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "7" => {
                let accion = prompt("¿(a)gregar o (q)uitar volumen de tubo?: ")?;
                println!("El volumen puede ser 0 para calcularlo de longitud y diámetro.");
                let volumen = prompt_f64("Volumen [mL]: ")?;
                let longitud = prompt_f64("Longitud [mm]: ")?;
                let diametro = prompt_f64("Diámetro [mm]: ")?;
                let res = match accion.trim() {
                    "a" => red.add_tube_volume(volumen, longitud, diametro),
                    "q" => red.remove_tube_volume(volumen, longitud, diametro),
                    other => {
                        eprintln!("Opción inválida: {}", other);
                        continue;
                    }
                };
                match res {
                    Ok(v) => println!("Volumen de tubos: {:.3} mL (se movieron {:.3} mL)", red.tube_volume_ml(), v),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "8" => {
                if let Err(e) = red.validate_complete() {
                    eprintln!("Aviso: {}", e);
                }
                let retencion = prompt_f64("Tiempo de retención deseado [min]: ")?;
                let volumen_total = red.total_volume_ml();
                match red.compute_flow_rates(volumen_total, retencion) {
                    Ok(caudales) => {
                        println!("\n========= CAUDALES =========");
                        for (id, caudal) in caudales {
                            let nombre = red.syringe(id).map(|s| s.name().to_string()).unwrap_or_default();
                            println!("Jeringa {} ({}): {:.6} mL/min", id, nombre, caudal);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "9" => {
                let ids: Vec<u32> = red.syringes().iter().map(|s| s.id()).collect();
                for id in ids {
                    let nombre = red.syringe(id).map(|s| s.name().to_string()).unwrap_or_default();
                    let caudal = prompt_f64(&format!("Caudal para jeringa {} ({}) [mL/min]: ", id, nombre))?;
                    if let Err(e) = red.set_flow_rate(id, caudal) {
                        eprintln!("Error: {}", e);
                    }
                }
                match red.compute_retention_time(red.total_volume_ml()) {
                    Ok(t) => println!("Tiempo de retención del setup: {:.3} min", t),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "10" => {
                let formato = prompt("¿Formato (t)abla o (j)son?: ")?;
                let reporte = red.report();
                if formato.trim() == "j" {
                    println!("{}", serde_json::to_string_pretty(&reporte)?);
                } else {
                    imprimir_reporte(&reporte);
                }
            }
            "11" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

/// Insiste hasta recibir un número válido (usar punto como separador
/// decimal).
fn prompt_f64(msg: &str) -> io::Result<f64> {
    loop {
        let s = prompt(msg)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("Entrada inválida, usar punto como separador decimal."),
        }
    }
}

fn prompt_u32(msg: &str) -> io::Result<u32> {
    loop {
        let s = prompt(msg)?;
        match s.trim().parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("Entrada inválida, se espera un entero."),
        }
    }
}

fn listar(red: &ReactorNetwork) {
    println!("\nReactores:");
    for r in red.reactors() {
        println!("  {}", r);
    }
    println!("Jeringas:");
    for s in red.syringes() {
        println!("  {}", s);
    }
}

fn imprimir_reporte(reporte: &SetupReport) {
    println!("\n================ SETUP DE REACCIÓN ================");
    println!("Setup         : {}", reporte.setup_id);
    println!("Generado      : {}", reporte.generated_at);
    println!("Volumen total : {:.3} mL", reporte.total_volume_ml);
    match reporte.retention_time_min {
        Some(t) => println!("Retención     : {:.3} min", t),
        None => println!("Retención     : sin calcular"),
    }
    println!("\nID | NOMBRE           | VOL [mL] | SALIDA");
    println!("---------------------------------------------------");
    for r in &reporte.reactors {
        let salida = r.output.map(|o| o.to_string()).unwrap_or_else(|| "-".into());
        println!("{:>2} | {:<16} | {:>8.3} | {}", r.id, r.name, r.volume_ml, salida);
    }
    println!("\nID | NOMBRE           | VOL [mL] | CONECTADA A | CAUDAL [mL/min]");
    println!("----------------------------------------------------------------");
    for s in &reporte.syringes {
        let conectada = s.connected_to.map(|r| format!("reactor {}", r)).unwrap_or_else(|| "-".into());
        let caudal = s.flow_rate_ml_min.map(|f| format!("{:.6}", f)).unwrap_or_else(|| "sin calcular".into());
        println!("{:>2} | {:<16} | {:>8.3} | {:<11} | {}", s.id, s.name, s.volume_ml, conectada, caudal);
    }
}
