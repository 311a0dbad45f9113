// src/session/sessao_tests.rs
//
// End-to-end scenarios against the gateway and the facade, over an
// in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;

use super::import::{FichaVoluntario, FichasEmMemoria};
use super::{Habitat, LogIn, Sessao};
use crate::db::create_test_pool;
use crate::domain::{
    Doador, Donativo, Equipa, Funcionario, Material, Projeto, TipoDonativo, Voluntario,
};
use crate::error::AppError;
use crate::repositories::{Repositorio, SqliteFuncionarioRepository};

fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
}

/// Gateway over a fresh in-memory database with one provisioned staff
/// account: alice / segredo.
fn habitat_com_alice() -> Habitat {
    let pool = create_test_pool().unwrap();

    let funcionarios = SqliteFuncionarioRepository::new(Arc::new(pool.clone()));
    let mut alice = Funcionario::new(
        "alice".to_string(),
        "segredo".to_string(),
        "Alice Matos Silva".to_string(),
    );
    alice.permissoes.insert("doacoes".to_string());
    alice.permissoes.insert("projetos".to_string());
    funcionarios.put(&alice).unwrap();

    Habitat::open(pool).unwrap()
}

fn sessao() -> Sessao {
    match habitat_com_alice().log_in("alice", "segredo").unwrap() {
        LogIn::Autenticado(s) => s,
        _ => panic!("expected successful log-in"),
    }
}

fn doador(nif: &str, nome: &str) -> Doador {
    Doador::new(nif.to_string(), nome.to_string(), "210000000".to_string())
}

fn voluntario(nr: i64, nome: &str) -> Voluntario {
    Voluntario::new(nr, nome.to_string(), "930000000".to_string())
}

// ----------------------------------------------------------------------
// Authentication
// ----------------------------------------------------------------------

#[test]
fn test_log_in_unknown_user() {
    let habitat = habitat_com_alice();

    assert!(matches!(
        habitat.log_in("bob", "whatever").unwrap(),
        LogIn::UtilizadorDesconhecido
    ));
}

#[test]
fn test_log_in_wrong_password() {
    let habitat = habitat_com_alice();

    assert!(matches!(
        habitat.log_in("alice", "errada").unwrap(),
        LogIn::PasswordIncorreta
    ));
}

#[test]
fn test_log_in_success_carries_staff_record() {
    let sessao = sessao();

    assert_eq!(sessao.username(), "alice");
    assert_eq!(sessao.funcionario_nome_curto(), "Alice Silva");
    assert!(sessao.tem_permissoes(&["doacoes".to_string()]));
    assert!(!sessao.tem_permissoes(&["rh".to_string()]));
}

#[test]
fn test_same_gateway_opens_multiple_sessions() {
    let habitat = habitat_com_alice();

    let primeira = match habitat.log_in("alice", "segredo").unwrap() {
        LogIn::Autenticado(s) => s,
        _ => panic!("expected successful log-in"),
    };
    primeira.save_doador(&doador("111111111", "Rui Costa")).unwrap();
    primeira.close();

    let segunda = match habitat.log_in("alice", "segredo").unwrap() {
        LogIn::Autenticado(s) => s,
        _ => panic!("expected successful log-in"),
    };
    assert!(segunda.doador_existe("111111111").unwrap());
}

// ----------------------------------------------------------------------
// Save / edit / remove discipline
// ----------------------------------------------------------------------

#[test]
fn test_save_then_exists_then_get() {
    let sessao = sessao();
    let d = doador("123456789", "Maria Antunes");

    assert!(sessao.save_doador(&d).unwrap());
    assert!(sessao.doador_existe("123456789").unwrap());
    assert_eq!(sessao.get_doador("123456789").unwrap().nome, "Maria Antunes");
}

#[test]
fn test_save_refuses_duplicate_key() {
    let sessao = sessao();
    sessao.save_doador(&doador("123456789", "Maria Antunes")).unwrap();

    assert!(!sessao.save_doador(&doador("123456789", "Outro Nome")).unwrap());
    // The original record survives
    assert_eq!(sessao.get_doador("123456789").unwrap().nome, "Maria Antunes");
}

#[test]
fn test_edit_refuses_absent_key() {
    let sessao = sessao();

    assert!(!sessao.edit_doador(&doador("999999999", "Ninguém")).unwrap());
    assert!(!sessao.doador_existe("999999999").unwrap());
}

#[test]
fn test_edit_overwrites_existing() {
    let sessao = sessao();
    sessao.save_doador(&doador("123456789", "Maria Antunes")).unwrap();

    assert!(sessao.edit_doador(&doador("123456789", "Maria A. Antunes")).unwrap());
    assert_eq!(
        sessao.get_doador("123456789").unwrap().nome,
        "Maria A. Antunes"
    );
}

#[test]
fn test_remove_twice_second_is_false() {
    let sessao = sessao();
    sessao.save_doador(&doador("123456789", "Maria Antunes")).unwrap();

    assert!(sessao.rem_doador("123456789").unwrap());
    assert!(!sessao.rem_doador("123456789").unwrap());
}

#[test]
fn test_get_absent_is_not_found() {
    let sessao = sessao();

    match sessao.get_doador("000000000") {
        Err(AppError::NotFound { entidade, chave }) => {
            assert_eq!(entidade, "Doador");
            assert_eq!(chave, "000000000");
        }
        other => panic!("expected NotFound, got {:?}", other.map(|d| d.nif)),
    }
}

// ----------------------------------------------------------------------
// Donations
// ----------------------------------------------------------------------

#[test]
fn test_total_doado_sums_monetary_only() {
    let sessao = sessao();
    sessao.save_doador(&doador("123456789", "Maria Antunes")).unwrap();

    sessao
        .save_donativo(&Donativo::new(
            1,
            "123456789".to_string(),
            data(2014, 3, 1),
            TipoDonativo::Monetario { valor: 50.0 },
        ))
        .unwrap();
    sessao
        .save_donativo(&Donativo::new(
            2,
            "123456789".to_string(),
            data(2014, 3, 2),
            TipoDonativo::EmEspecie {
                descricao: "Ferramentas".to_string(),
            },
        ))
        .unwrap();
    sessao
        .save_donativo(&Donativo::new(
            3,
            "123456789".to_string(),
            data(2014, 3, 3),
            TipoDonativo::Monetario { valor: 30.0 },
        ))
        .unwrap();

    assert_eq!(sessao.total_doado_por_doador("123456789").unwrap(), 80.0);
}

#[test]
fn test_total_doado_unknown_donor_is_zero() {
    let sessao = sessao();

    assert_eq!(sessao.total_doado_por_doador("999999999").unwrap(), 0.0);
}

#[test]
fn test_generate_donativo_key_starts_at_one() {
    let sessao = sessao();

    assert_eq!(sessao.generate_donativo_key().unwrap(), 1);
}

// ----------------------------------------------------------------------
// Search
// ----------------------------------------------------------------------

#[test]
fn test_search_is_case_insensitive_substring() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(1, "Anna Reis")).unwrap();
    sessao.save_voluntario(&voluntario(2, "Joanna Pires")).unwrap();
    sessao.save_voluntario(&voluntario(3, "Bruno Lopes")).unwrap();

    let encontrados = sessao.search_voluntario("ann").unwrap();
    let nomes: Vec<&str> = encontrados.iter().map(|v| v.nome.as_str()).collect();

    assert_eq!(nomes, vec!["Anna Reis", "Joanna Pires"]);
}

#[test]
fn test_search_empty_term_matches_all() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(1, "Anna Reis")).unwrap();
    sessao.save_voluntario(&voluntario(2, "Bruno Lopes")).unwrap();

    assert_eq!(sessao.search_voluntario("  ").unwrap().len(), 2);
}

#[test]
fn test_search_material_by_name() {
    let sessao = sessao();
    sessao
        .save_material(&Material::new(1, "Cimento".to_string(), "Saco 25kg".to_string(), 40))
        .unwrap();
    sessao
        .save_material(&Material::new(2, "Tijolo".to_string(), "Furado".to_string(), 500))
        .unwrap();

    let encontrados = sessao.search_material("cime").unwrap();
    assert_eq!(encontrados.len(), 1);
    assert_eq!(encontrados[0].nome, "Cimento");
}

// ----------------------------------------------------------------------
// Volunteering hours
// ----------------------------------------------------------------------

#[test]
fn test_add_horas_rejected_for_missing_project() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(7, "Anna Reis")).unwrap();

    assert!(!sessao.add_horas_voluntariado(999, 7, 5).unwrap());
    // Nothing was recorded anywhere
    assert_eq!(sessao.get_voluntario(7).unwrap().horas, 0);
}

#[test]
fn test_add_horas_accumulates_per_project() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(7, "Anna Reis")).unwrap();
    sessao
        .save_projeto(&Projeto::new(1, "Casa Vila Verde".to_string(), "Reconstrução".to_string()))
        .unwrap();
    sessao
        .save_projeto(&Projeto::new(2, "Telhados".to_string(), "Reparações".to_string()))
        .unwrap();

    assert!(sessao.add_horas_voluntariado(1, 7, 5).unwrap());
    assert!(sessao.add_horas_voluntariado(1, 7, 3).unwrap());
    assert!(sessao.add_horas_voluntariado(2, 7, 2).unwrap());

    assert_eq!(sessao.get_voluntario(7).unwrap().horas, 10);
}

// ----------------------------------------------------------------------
// Teams
// ----------------------------------------------------------------------

#[test]
fn test_team_roster_follows_volunteer_assignment() {
    let sessao = sessao();
    let mut ana = voluntario(1, "Ana Reis");
    ana.equipa = Some(10);
    let mut bruno = voluntario(2, "Bruno Lopes");
    bruno.equipa = Some(10);
    let carla = voluntario(3, "Carla Nunes");

    sessao.save_voluntario(&ana).unwrap();
    sessao.save_voluntario(&bruno).unwrap();
    sessao.save_voluntario(&carla).unwrap();
    sessao
        .save_equipa(&Equipa::new(10, "Alfa".to_string(), "Portugal".to_string(), 1))
        .unwrap();

    let na_equipa = sessao.voluntarios_da_equipa(10).unwrap();
    assert_eq!(na_equipa.len(), 2);

    let sem_equipa = sessao.voluntarios_sem_equipa().unwrap();
    assert_eq!(sem_equipa.len(), 1);
    assert_eq!(sem_equipa[0].nome, "Carla Nunes");

    assert_eq!(sessao.get_equipa(10).unwrap().tamanho(), 2);
}

#[test]
fn test_nome_chefe_equipa() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(1, "Ana Sofia Reis")).unwrap();
    sessao
        .save_equipa(&Equipa::new(10, "Alfa".to_string(), "Portugal".to_string(), 1))
        .unwrap();

    assert_eq!(sessao.nome_chefe_equipa(10).unwrap(), "Ana Reis");
}

#[test]
fn test_nome_chefe_surfaces_dangling_leader() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(1, "Ana Reis")).unwrap();
    sessao
        .save_equipa(&Equipa::new(10, "Alfa".to_string(), "Portugal".to_string(), 1))
        .unwrap();

    // Removing the leader leaves the team's chefe dangling
    sessao.rem_voluntario(1).unwrap();

    assert!(matches!(
        sessao.nome_chefe_equipa(10),
        Err(AppError::NotFound { entidade: "Voluntario", .. })
    ));
}

// ----------------------------------------------------------------------
// Key generation
// ----------------------------------------------------------------------

#[test]
fn test_generated_keys_are_max_plus_one() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(1, "Ana Reis")).unwrap();
    sessao.save_voluntario(&voluntario(5, "Bruno Lopes")).unwrap();

    // max + 1, gaps are never reused
    assert_eq!(sessao.generate_voluntario_key().unwrap(), 6);
}

// ----------------------------------------------------------------------
// Sheet import
// ----------------------------------------------------------------------

#[test]
fn test_importar_voluntarios_assigns_sequential_keys() {
    let sessao = sessao();
    sessao.save_voluntario(&voluntario(3, "Bruno Lopes")).unwrap();

    let mut fonte = FichasEmMemoria::new(vec![
        FichaVoluntario {
            nome: "Ana Reis".to_string(),
            contacto: "930000001".to_string(),
            data_nascimento: Some(data(1990, 5, 17)),
            linguas: vec!["pt".to_string(), "en".to_string()],
        },
        FichaVoluntario {
            nome: "Carla Nunes".to_string(),
            contacto: "930000002".to_string(),
            data_nascimento: None,
            linguas: vec![],
        },
    ]);

    let atribuidos = sessao.importar_voluntarios(&mut fonte).unwrap();
    assert_eq!(atribuidos, vec![4, 5]);

    let ana = sessao.get_voluntario(4).unwrap();
    assert_eq!(ana.nome, "Ana Reis");
    assert_eq!(ana.linguas, vec!["pt".to_string(), "en".to_string()]);
    assert_eq!(sessao.total_voluntarios().unwrap(), 3);
}

#[test]
fn test_importar_from_empty_source() {
    let sessao = sessao();
    let mut fonte = FichasEmMemoria::new(vec![]);

    assert!(sessao.importar_voluntarios(&mut fonte).unwrap().is_empty());
    assert!(sessao.voluntarios_is_empty().unwrap());
}
