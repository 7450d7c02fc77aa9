use anyhow::Context;
use form_persistence::DieselKeyValueStore;
use form_storage::FormStorage;
use form_wizard::query::{document_lines, lookup_message, summary_lines};
use form_wizard::{step_fields, StepOutcome, UploadOutcome, WizardConfig, WizardController};
use iniciativa_domain::{DocumentMetadata, FormPatch, SubmitterKind, Ubicacion};
use iniciativas_api::{HttpIniciativasApi, InMemoryIniciativasApi, IniciativasApi};
use log::{info, warn};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Menú interactivo para radicar iniciativas.
///
/// Opciones soportadas:
/// 1) Nueva iniciativa o continuar la guardada
/// 2) Consultar iniciativa por radicado
/// 3) Ver último envío e historial
/// 4) Reiniciar formulario
/// 5) Salir
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let config = WizardConfig::from_env().context("configuración inválida")?;
    let api: Arc<dyn IniciativasApi> = if config.offline {
        warn!("INICIATIVAS_OFFLINE activo: se usa el backend en memoria");
        Arc::new(InMemoryIniciativasApi::new())
    } else {
        Arc::new(HttpIniciativasApi::new(config.api_base_url.clone(), config.api_timeout).context("cliente HTTP")?)
    };
    let store = match &config.db_url {
        Some(url) => DieselKeyValueStore::new(url),
        None => form_persistence::new_from_env(),
    }.context("no se pudo abrir el almacenamiento del formulario")?;
    let storage = FormStorage::new(Arc::new(store));
    info!("backend {} (entidad {})", config.api_base_url, config.entidad_id);

    let mut ctl = WizardController::open(api, storage, config);

    loop {
        println!("\n== Radicación de iniciativas ==");
        if ctl.session().storage().has_stored_form() {
            println!("1) Continuar iniciativa guardada (paso {})", ctl.state().step);
        } else {
            println!("1) Nueva iniciativa");
        }
        println!("2) Consultar iniciativa por radicado");
        println!("3) Ver último envío e historial");
        println!("4) Reiniciar formulario");
        println!("5) Salir");
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" => run_wizard(&mut ctl).await?,
            "2" => {
                let radicado = prompt("Número de radicado: ")?;
                match ctl.lookup(&radicado).await {
                    Ok(ini) => {
                        for (label, value) in summary_lines(&ini) {
                            println!("{:<22} {}", label, value);
                        }
                        println!("Documentos adjuntos:");
                        match ctl.lookup_documents(ini.id).await {
                            Ok(docs) => {
                                for line in document_lines(&docs) {
                                    println!("  {}", line);
                                }
                            }
                            Err(e) => eprintln!("  {}", e.user_message()),
                        }
                    }
                    Err(e) => eprintln!("{}", lookup_message(&e)),
                }
            }
            "3" => {
                let storage = ctl.session().storage();
                match storage.last_success() {
                    Some(r) => println!("Último envío: radicado {} ({})", r.radicado, r.timestamp.to_rfc3339()),
                    None => println!("Aún no hay envíos"),
                }
                for r in storage.history().iter().rev() {
                    println!("  {} | {} | {}", r.radicado, r.tipo_remitente.label(), r.timestamp.to_rfc3339());
                }
            }
            "4" => {
                let confirm = prompt("Se perderán los datos no enviados. Escribir 'si' para confirmar: ")?;
                if confirm.trim().eq_ignore_ascii_case("si") {
                    if let Err(e) = ctl.reset() {
                        eprintln!("{}", e.user_message());
                    } else {
                        println!("Formulario reiniciado");
                    }
                } else {
                    println!("Reinicio cancelado");
                }
            }
            "5" => {
                println!("Saliendo...");
                break;
            }
            other => println!("Opción inválida: {}", other),
        }
    }

    Ok(())
}

async fn run_wizard(ctl: &mut WizardController) -> anyhow::Result<()> {
    if ctl.state().step == 1 {
        choose_kind(ctl)?;
    }
    loop {
        let state = ctl.state();
        println!("\n-- {} | paso {} de {} --", state.submitter_kind.label(), state.step, state.max_steps());
        if state.submitter_kind == SubmitterKind::Person && state.step == 3 {
            attach_documents(ctl).await?;
        } else {
            if state.step == 2 {
                show_options(ctl).await;
            }
            fill_fields(ctl)?;
        }

        let action = prompt("s) siguiente  a) anterior  m) menú: ")?;
        match action.trim() {
            "s" => match ctl.next().await {
                Ok(StepOutcome::Advanced(step)) => println!("Paso {} completado", step - 1),
                Ok(StepOutcome::Invalid) => {
                    for (field, message) in ctl.session().validation().errors() {
                        println!("  {}: {}", field, message);
                    }
                }
                Ok(StepOutcome::Submitted(receipt)) => {
                    println!("¡Iniciativa radicada! Número de radicado: {}", receipt.radicado);
                    let again = prompt("¿Radicar otra iniciativa con el mismo remitente? (s/n): ")?;
                    ctl.finish(again.trim().eq_ignore_ascii_case("s"))?;
                    return Ok(());
                }
                Err(e) => eprintln!("{}", e.user_message()),
            },
            "a" => {
                if let Err(e) = ctl.prev() {
                    eprintln!("{}", e.user_message());
                }
            }
            "m" => return Ok(()),
            other => println!("Opción inválida: {}", other),
        }
    }
}

fn choose_kind(ctl: &mut WizardController) -> anyhow::Result<()> {
    let current = ctl.state().submitter_kind;
    let answer = prompt(&format!("Tipo de remitente (persona/entidad/organizacion) [{}]: ", current))?;
    if answer.trim().is_empty() {
        return Ok(());
    }
    match answer.trim().parse::<SubmitterKind>() {
        Ok(kind) => ctl.session_mut().update_form_data(&FormPatch::default().with_kind(kind))?,
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

fn fill_fields(ctl: &mut WizardController) -> anyhow::Result<()> {
    let kind = ctl.state().submitter_kind;
    for field in step_fields(ctl.state()) {
        let current = field.value(ctl.state()).to_string();
        let value = prompt(&format!("{} [{}]: ", field.label(), current))?;
        if value.trim().is_empty() {
            continue;
        }
        match ctl.input(field.name(), value.trim()) {
            Ok(verdict) if !verdict.is_valid => println!("  {}", verdict.message),
            Ok(_) => {}
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }
    if ctl.state().step == 2 {
        let departamento = prompt("Departamento (enter para omitir): ")?;
        if !departamento.trim().is_empty() {
            let ciudad = prompt("Ciudad: ")?;
            let mut ubicaciones = ctl.state().active_branch().initiative().ubicaciones.clone();
            ubicaciones.push(Ubicacion { departamento: departamento.trim().to_string(), ciudad: ciudad.trim().to_string() });
            ctl.session_mut().update_form_data(&FormPatch::default().with_locations(kind, ubicaciones))?;
        }
    }
    Ok(())
}

async fn show_options(ctl: &WizardController) {
    match ctl.step_options().await {
        Ok(options) => {
            println!("Tipos de proyecto:");
            for t in &options.tipos_proyecto {
                println!("  {} - {}", t.id, t.tipo_proyecto);
            }
            println!("Poblaciones objetivo:");
            for p in &options.poblaciones {
                println!("  {} - {}", p.id, p.poblacion_objetivo);
            }
        }
        Err(e) => warn!("no se pudieron cargar los catálogos: {}", e),
    }
}

async fn attach_documents(ctl: &mut WizardController) -> anyhow::Result<()> {
    let slots: Vec<(String, String, bool)> = ctl.state()
                                                .persona
                                                .documentos
                                                .iter()
                                                .map(|(k, s)| (k.clone(), s.label.clone(), s.uploaded))
                                                .collect();
    for (key, label, uploaded) in slots {
        let mark = if uploaded { "cargado" } else { "pendiente" };
        let path = prompt(&format!("{} ({}). Ruta del archivo (enter para omitir): ", label, mark))?;
        let path = path.trim();
        if path.is_empty() {
            continue;
        }
        let contenido = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("No se pudo leer {}: {}", path, e);
                continue;
            }
        };
        let filename = Path::new(path).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let metadata = DocumentMetadata::new(filename, mime_for(path), contenido.len() as u64);
        match ctl.upload_document(&key, metadata, contenido).await {
            Ok(UploadOutcome::Uploaded) => println!("  {} cargado", label),
            Ok(UploadOutcome::Pending) => println!("  {} se cargará al enviar", label),
            Err(e) => eprintln!("  {}", e.user_message()),
        }
    }
    Ok(())
}

fn mime_for(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
